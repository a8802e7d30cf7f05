use crate::entities::{AccessToken, Admin};
use crate::models::{AccessTokenRecord, AdminRecord};
use admix_data::condition::equal;
use admix_data::eager::EagerLoad;
use admix_data::model::Model;
use admix_data::repository::Repository;
use admix_data_sqlx::sql::SqlBuilder;
use admix_data_sqlx::{SqlxErrorExt, SqlxRepository, SqlxResult, SqlxStore};
use std::sync::Arc;

/// Admin account lookups backed by the generic repository.
pub struct AdminRepo {
    repo: SqlxRepository<AdminRecord>,
}

impl AdminRepo {
    pub fn new(store: Arc<SqlxStore>) -> Self {
        Self {
            repo: SqlxRepository::new(store),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> SqlxResult<Option<Admin>> {
        self.repo.first_by(&equal("email", email), &[]).await
    }

    pub async fn get_by_id(&self, id: i64) -> SqlxResult<Option<Admin>> {
        self.repo.find_by_id(&id, &[]).await
    }

    /// Stamps only the last-login column, leaving the rest of the row alone.
    pub async fn update_last_login(&self, admin: &Admin) -> SqlxResult<()> {
        let record = AdminRecord::from_entity(admin);
        let (sql, params) = SqlBuilder::new(AdminRecord::table_name(), self.repo.store().dialect())
            .condition(equal("id", record.id))
            .build_update_where(&["last_login_at"], vec![record.last_login_at.clone().into()]);
        let mut handle = self.repo.store().handle().await;
        handle
            .execute(&sql, &params)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(())
    }
}

/// Issued-token persistence; lookups attach the owning admin in the same
/// read.
pub struct TokenRepo {
    repo: SqlxRepository<AccessTokenRecord>,
}

impl TokenRepo {
    pub fn new(store: Arc<SqlxStore>) -> Self {
        Self {
            repo: SqlxRepository::new(store),
        }
    }

    pub async fn create(&self, token: &AccessToken) -> SqlxResult<AccessToken> {
        self.repo.insert(token).await
    }

    pub async fn get(&self, token: &str) -> SqlxResult<Option<AccessToken>> {
        self.repo
            .first_by(&equal("token", token), &[EagerLoad::new("admin")])
            .await
    }

    pub async fn invalidate(&self, token: &AccessToken) -> SqlxResult<()> {
        self.repo.delete(token).await
    }
}
