use crate::entities::Category;
use crate::models::CategoryRecord;
use admix_data::condition::{and, between, contains, equal, not_equal};
use admix_data::model::Model;
use admix_data::options::QueryOptions;
use admix_data::page::PageList;
use admix_data::repository::Repository;
use admix_data::value::Value;
use admix_data_sqlx::sql::SqlBuilder;
use admix_data_sqlx::time::format_timestamp;
use admix_data_sqlx::{SqlxErrorExt, SqlxRepository, SqlxResult, SqlxStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Listing filters for the category index.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilters {
    /// Substring match on the name.
    pub name: Option<String>,
    pub status: Option<i64>,
    /// Inclusive creation-time window; both bounds required to apply.
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

pub struct CategoryRepo {
    repo: SqlxRepository<CategoryRecord>,
}

impl CategoryRepo {
    pub fn new(store: Arc<SqlxStore>) -> Self {
        Self {
            repo: SqlxRepository::new(store),
        }
    }

    pub async fn list(
        &self,
        filters: &CategoryFilters,
        sort: &[(String, bool)],
        page: i64,
        per_page: i64,
    ) -> SqlxResult<PageList<Category>> {
        let mut conditions = Vec::new();
        if let Some(name) = &filters.name {
            conditions.push(contains("name", name));
        }
        if let Some(status) = filters.status {
            conditions.push(equal("status", status));
        }
        if let (Some(from), Some(to)) = (&filters.created_from, &filters.created_to) {
            conditions.push(between(
                "created_at",
                format_timestamp(from),
                format_timestamp(to),
            ));
        }
        let mut opts = QueryOptions::new().paginate(page, per_page);
        for (column, ascending) in sort {
            opts = opts.order_by(column, *ascending);
        }
        self.repo.all_by(&and(conditions), &opts).await
    }

    pub async fn get(&self, id: i64) -> SqlxResult<Option<Category>> {
        self.repo.find_by_id(&id, &[]).await
    }

    pub async fn store(&self, category: &Category) -> SqlxResult<Category> {
        self.repo.insert(category).await
    }

    pub async fn update(&self, category: &Category) -> SqlxResult<Category> {
        self.repo.update(category).await
    }

    pub async fn delete(&self, category: &Category) -> SqlxResult<()> {
        self.repo.delete(category).await
    }

    pub async fn exists(&self, id: i64) -> SqlxResult<bool> {
        self.repo.exists(&id).await
    }

    /// Clears the default flag on every category except the given one. The
    /// generic repository only writes by primary key, so this drops to the
    /// store handle.
    pub async fn clear_other_defaults(&self, except: &Category) -> SqlxResult<()> {
        let (sql, params) =
            SqlBuilder::new(CategoryRecord::table_name(), self.repo.store().dialect())
                .condition(not_equal("id", except.id))
                .build_update_where(&["is_default"], vec![Value::Bool(false)]);
        let mut handle = self.repo.store().handle().await;
        handle
            .execute(&sql, &params)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(())
    }
}
