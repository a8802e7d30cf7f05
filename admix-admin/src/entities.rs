use chrono::{DateTime, Utc};
use serde::Serialize;

/// An administrator account.
///
/// The password hash stays internal: it is carried for verification but
/// never serialized, and the id is likewise kept out of API payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin {
    #[serde(skip_serializing)]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An issued admin access token.
///
/// Only the opaque token and its remaining lifetime are exposed;
/// `expired_in` is computed at issue time by the token manager and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessToken {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(rename = "access_token")]
    pub token: String,
    #[serde(skip_serializing)]
    pub expired_at: DateTime<Utc>,
    pub expired_in: f64,
    #[serde(skip_serializing)]
    pub admin_id: i64,
    #[serde(skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub admin: Option<Admin>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        self.expired_at < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_expired() {
        let mut token = AccessToken {
            id: 1,
            token: "t".into(),
            expired_at: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            expired_in: 0.0,
            admin_id: 1,
            created_at: None,
            admin: None,
        };
        assert!(token.is_expired());
        token.expired_at = Utc::now() + chrono::Duration::hours(1);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_secrets_stay_out_of_payloads() {
        let admin = Admin {
            id: 7,
            name: "root".into(),
            email: "root@example.com".into(),
            password: "argon2-hash".into(),
            last_login_at: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["email"], "root@example.com");
    }

    #[test]
    fn test_token_payload_shape() {
        let token = AccessToken {
            id: 1,
            token: "opaque".into(),
            expired_at: Utc::now(),
            expired_in: 3600.0,
            admin_id: 9,
            created_at: None,
            admin: None,
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["access_token"], "opaque");
        assert_eq!(json["expired_in"], 3600.0);
        assert!(json.get("admin_id").is_none());
    }
}
