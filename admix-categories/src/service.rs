//! Use-case-level writes with transaction scoping: begin before the
//! multi-step operation, commit on success, roll back on any failure.
//! A transaction belongs to one logical unit of work and is opened and
//! closed within it; the store refuses to nest.

use crate::datasource::{CategoryFilters, CategoryRepo};
use crate::entities::Category;
use admix_data::page::PageList;
use admix_data_sqlx::{SqlxResult, SqlxStore};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub status: i64,
    pub is_default: bool,
}

pub struct CategoryService {
    store: Arc<SqlxStore>,
    repo: CategoryRepo,
}

impl CategoryService {
    pub fn new(store: Arc<SqlxStore>) -> Self {
        Self {
            repo: CategoryRepo::new(store.clone()),
            store,
        }
    }

    pub async fn list(
        &self,
        filters: &CategoryFilters,
        sort: &[(String, bool)],
        page: i64,
        per_page: i64,
    ) -> SqlxResult<PageList<Category>> {
        self.repo.list(filters, sort, page, per_page).await
    }

    pub async fn get(&self, id: i64) -> SqlxResult<Option<Category>> {
        self.repo.get(id).await
    }

    /// Creates a category; when it is flagged as the default, every other
    /// category loses the flag in the same transaction.
    pub async fn create(&self, input: CategoryInput) -> SqlxResult<Category> {
        let now = Utc::now();
        let category = Category {
            id: 0,
            name: input.name,
            description: input.description,
            status: input.status,
            is_default: input.is_default,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.store.begin().await?;
        match self.write_default_aware(&category, true).await {
            Ok(stored) => {
                self.store.commit().await?;
                Ok(stored)
            }
            Err(err) => {
                self.rollback_quietly().await;
                Err(err)
            }
        }
    }

    pub async fn update(&self, current: &Category, input: CategoryInput) -> SqlxResult<Category> {
        let category = Category {
            id: current.id,
            name: input.name,
            description: input.description,
            status: input.status,
            is_default: input.is_default,
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
        };
        self.store.begin().await?;
        match self.write_default_aware(&category, false).await {
            Ok(stored) => {
                self.store.commit().await?;
                Ok(stored)
            }
            Err(err) => {
                self.rollback_quietly().await;
                Err(err)
            }
        }
    }

    pub async fn delete(&self, category: &Category) -> SqlxResult<()> {
        self.store.begin().await?;
        match self.repo.delete(category).await {
            Ok(()) => self.store.commit().await,
            Err(err) => {
                self.rollback_quietly().await;
                Err(err)
            }
        }
    }

    async fn write_default_aware(&self, category: &Category, create: bool) -> SqlxResult<Category> {
        let stored = if create {
            self.repo.store(category).await?
        } else {
            self.repo.update(category).await?
        };
        if stored.is_default {
            self.repo.clear_other_defaults(&stored).await?;
        }
        Ok(stored)
    }

    async fn rollback_quietly(&self) {
        if let Err(err) = self.store.rollback().await {
            tracing::error!(error = %err, "rollback failed");
        }
    }
}
