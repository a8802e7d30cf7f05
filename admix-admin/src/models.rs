//! Storage models for the `admins` and `admin_access_tokens` tables.
//!
//! Timestamps are stored as RFC 3339 text (see `admix_data_sqlx::time`) and
//! converted to `chrono` values at the entity boundary.

use crate::entities::{AccessToken, Admin};
use admix_data::eager::RelationDef;
use admix_data::model::Model;
use admix_data::value::Value;
use admix_data_sqlx::time::{format_timestamp, parse_timestamp};
use admix_data_sqlx::SqlxModel;
use sqlx::any::AnyRow;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub last_login_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Model for AdminRecord {
    type Entity = Admin;
    type Key = i64;

    fn table_name() -> &'static str {
        "admins"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "name",
            "email",
            "password",
            "last_login_at",
            "created_at",
            "updated_at",
        ]
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.email.clone().into(),
            self.password.clone().into(),
            self.last_login_at.clone().into(),
            self.created_at.clone().into(),
            self.updated_at.clone().into(),
        ]
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn to_entity(&self) -> Admin {
        Admin {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            last_login_at: self.last_login_at.as_deref().map(parse_timestamp),
            created_at: self.created_at.as_deref().map(parse_timestamp),
            updated_at: self.updated_at.as_deref().map(parse_timestamp),
        }
    }

    fn from_entity(entity: &Admin) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            email: entity.email.clone(),
            password: entity.password.clone(),
            last_login_at: entity.last_login_at.as_ref().map(format_timestamp),
            created_at: entity.created_at.as_ref().map(format_timestamp),
            updated_at: entity.updated_at.as_ref().map(format_timestamp),
        }
    }
}

impl SqlxModel for AdminRecord {}

/// Round-trip exceptions for this type: the entity's `expired_in` is derived
/// at issue time and never persisted, and the attached `admin` relation is
/// dropped by `from_entity` (associations are not cascaded on writes).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AccessTokenRecord {
    pub id: i64,
    pub token: String,
    pub expired_at: String,
    pub admin_id: i64,
    pub created_at: Option<String>,
    #[sqlx(skip)]
    pub admin: Option<AdminRecord>,
}

impl Model for AccessTokenRecord {
    type Entity = AccessToken;
    type Key = i64;

    fn table_name() -> &'static str {
        "admin_access_tokens"
    }

    fn columns() -> &'static [&'static str] {
        &["token", "expired_at", "admin_id", "created_at"]
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.token.clone().into(),
            self.expired_at.clone().into(),
            self.admin_id.into(),
            self.created_at.clone().into(),
        ]
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn to_entity(&self) -> AccessToken {
        AccessToken {
            id: self.id,
            token: self.token.clone(),
            expired_at: parse_timestamp(&self.expired_at),
            expired_in: 0.0,
            admin_id: self.admin_id,
            created_at: self.created_at.as_deref().map(parse_timestamp),
            admin: self.admin.as_ref().map(|a| a.to_entity()),
        }
    }

    fn from_entity(entity: &AccessToken) -> Self {
        Self {
            id: entity.id,
            token: entity.token.clone(),
            expired_at: format_timestamp(&entity.expired_at),
            admin_id: entity.admin_id,
            created_at: entity.created_at.as_ref().map(format_timestamp),
            admin: None,
        }
    }

    fn relations() -> &'static [RelationDef] {
        &[RelationDef {
            name: "admin",
            table: "admins",
            remote_key: "id",
            local_key: "admin_id",
        }]
    }
}

impl SqlxModel for AccessTokenRecord {
    fn attach_related(&mut self, relation: &str, rows: &[&AnyRow]) {
        if relation == "admin" {
            self.admin = rows.first().and_then(|row| AdminRecord::from_row(*row).ok());
        }
    }
}
