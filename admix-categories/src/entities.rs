use chrono::{DateTime, Utc};
use serde::Serialize;

pub const STATUS_PUBLISHED: i64 = 10;
pub const STATUS_DRAFT: i64 = 11;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: i64,
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn is_public(&self) -> bool {
        self.status == STATUS_PUBLISHED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_public() {
        let mut category = Category {
            id: 1,
            name: "news".into(),
            description: None,
            status: STATUS_PUBLISHED,
            is_default: false,
            created_at: None,
            updated_at: None,
        };
        assert!(category.is_public());
        category.status = STATUS_DRAFT;
        assert!(!category.is_public());
    }
}
