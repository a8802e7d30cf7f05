use crate::entities::Category;
use admix_data::model::Model;
use admix_data::value::Value;
use admix_data_sqlx::time::{format_timestamp, parse_timestamp};
use admix_data_sqlx::SqlxModel;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: i64,
    pub is_default: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Model for CategoryRecord {
    type Entity = Category;
    type Key = i64;

    fn table_name() -> &'static str {
        "categories"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "name",
            "description",
            "status",
            "is_default",
            "created_at",
            "updated_at",
        ]
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.description.clone().into(),
            self.status.into(),
            self.is_default.into(),
            self.created_at.clone().into(),
            self.updated_at.clone().into(),
        ]
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn to_entity(&self) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            is_default: self.is_default,
            created_at: self.created_at.as_deref().map(parse_timestamp),
            updated_at: self.updated_at.as_deref().map(parse_timestamp),
        }
    }

    fn from_entity(entity: &Category) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            status: entity.status,
            is_default: entity.is_default,
            created_at: entity.created_at.as_ref().map(format_timestamp),
            updated_at: entity.updated_at.as_ref().map(format_timestamp),
        }
    }
}

impl SqlxModel for CategoryRecord {}
