//! Connection and transaction ownership.
//!
//! [`SqlxStore`] owns the live pool for the process lifetime: constructed
//! once at startup via [`SqlxStore::connect`], injected (usually as an
//! `Arc`) into every repository, and closed at shutdown. It holds at most
//! one transaction at a time; callers scope a transaction per logical unit
//! of work and never share one across concurrent requests.

use crate::config::DbConfig;
use crate::sql::Dialect;
use admix_data::error::DataError;
use admix_data::value::Value;
use sqlx::any::{AnyArguments, AnyQueryResult, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tokio::sync::{Mutex, MutexGuard};

static INSTALL_DRIVERS: Once = Once::new();

pub struct SqlxStore {
    pool: AnyPool,
    dialect: Dialect,
    tx: Mutex<Option<Transaction<'static, Any>>>,
    in_tx: AtomicBool,
}

impl SqlxStore {
    /// Connects with a bounded retry budget and fixed backoff, then verifies
    /// reachability. Surfaces [`DataError::Connect`] once the budget is
    /// exhausted.
    pub async fn connect(cfg: &DbConfig) -> Result<Self, DataError> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let url = cfg.connection_url();
        let dialect = Dialect::from_url(&url);
        let attempts = cfg.connect_attempts.max(1);
        let mut attempts_left = attempts;
        loop {
            match sqlx::any::AnyPoolOptions::new()
                .max_connections(cfg.max_pool_size.max(1))
                .connect(&url)
                .await
            {
                Ok(pool) => {
                    tracing::debug!(?dialect, "database connected");
                    return Ok(Self {
                        pool,
                        dialect,
                        tx: Mutex::new(None),
                        in_tx: AtomicBool::new(false),
                    });
                }
                Err(err) => {
                    attempts_left -= 1;
                    if attempts_left == 0 {
                        return Err(DataError::Connect {
                            attempts,
                            source: Box::new(err),
                        });
                    }
                    tracing::warn!(attempts_left, error = %err, "trying to connect to database");
                    tokio::time::sleep(cfg.connect_backoff()).await;
                }
            }
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Releases the underlying connections. Idempotent.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("database closed");
    }

    /// Starts the store-wide transaction. Fails with
    /// [`DataError::TransactionActive`] if one is already open; the open
    /// transaction is left untouched.
    pub async fn begin(&self) -> Result<(), DataError> {
        let mut guard = self.tx.lock().await;
        if guard.is_some() {
            return Err(DataError::TransactionActive);
        }
        let tx = self.pool.begin().await.map_err(DataError::datasource)?;
        *guard = Some(tx);
        self.in_tx.store(true, Ordering::Release);
        tracing::debug!("transaction started");
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), DataError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.take().ok_or(DataError::NoTransaction)?;
        self.in_tx.store(false, Ordering::Release);
        tx.commit().await.map_err(DataError::datasource)?;
        tracing::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), DataError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.take().ok_or(DataError::NoTransaction)?;
        self.in_tx.store(false, Ordering::Release);
        tx.rollback().await.map_err(DataError::datasource)?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    pub fn is_transaction(&self) -> bool {
        self.in_tx.load(Ordering::Acquire)
    }

    /// Classifies the backend's "no rows" signal. The repository layer uses
    /// this to map absent single-row lookups to `Ok(None)`.
    pub fn is_not_found(&self, err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::RowNotFound)
    }

    /// A query handle bound to the active transaction when one exists,
    /// otherwise to the base pool. Callers never need to know which.
    pub async fn handle(&self) -> QueryHandle<'_> {
        if self.is_transaction() {
            QueryHandle {
                pool: &self.pool,
                tx: Some(self.tx.lock().await),
            }
        } else {
            QueryHandle {
                pool: &self.pool,
                tx: None,
            }
        }
    }
}

/// Executes statements against whichever connection the store handed out.
///
/// While it wraps the active transaction it holds the store's transaction
/// lock, so all statements of one repository operation see a consistent
/// connection.
pub struct QueryHandle<'a> {
    pool: &'a AnyPool,
    tx: Option<MutexGuard<'a, Option<Transaction<'static, Any>>>>,
}

impl QueryHandle<'_> {
    pub async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<AnyRow>, sqlx::Error> {
        let query = bind_params(sqlx::query(sql), params);
        match self.tx.as_mut().and_then(|guard| guard.as_mut()) {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(self.pool).await,
        }
    }

    pub async fn fetch_one(&mut self, sql: &str, params: &[Value]) -> Result<AnyRow, sqlx::Error> {
        let query = bind_params(sqlx::query(sql), params);
        match self.tx.as_mut().and_then(|guard| guard.as_mut()) {
            Some(tx) => query.fetch_one(&mut **tx).await,
            None => query.fetch_one(self.pool).await,
        }
    }

    pub async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<AnyQueryResult, sqlx::Error> {
        let query = bind_params(sqlx::query(sql), params);
        match self.tx.as_mut().and_then(|guard| guard.as_mut()) {
            Some(tx) => query.execute(&mut **tx).await,
            None => query.execute(self.pool).await,
        }
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: &'q [Value],
) -> Query<'q, Any, AnyArguments<'q>> {
    for value in params {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            // lists are expanded away by the SQL builder
            Value::List(_) => query.bind(None::<String>),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;

    async fn memory_store() -> SqlxStore {
        SqlxStore::connect(&DbConfig::with_url("sqlite::memory:"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_not_found_classification() {
        let store = memory_store().await;
        assert!(store.is_not_found(&sqlx::Error::RowNotFound));
        assert!(!store.is_not_found(&sqlx::Error::PoolClosed));
    }

    #[tokio::test]
    async fn test_begin_twice_is_rejected() {
        let store = memory_store().await;
        store.begin().await.unwrap();
        assert!(matches!(
            store.begin().await,
            Err(DataError::TransactionActive)
        ));
        // the first transaction is untouched
        assert!(store.is_transaction());
        store.rollback().await.unwrap();
        assert!(!store.is_transaction());
    }

    #[tokio::test]
    async fn test_commit_without_transaction_is_rejected() {
        let store = memory_store().await;
        assert!(matches!(store.commit().await, Err(DataError::NoTransaction)));
        assert!(matches!(
            store.rollback().await,
            Err(DataError::NoTransaction)
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store = memory_store().await;
        store.close().await;
        store.close().await;
    }

    #[tokio::test]
    async fn test_connect_exhausts_attempt_budget() {
        let cfg = DbConfig {
            url: Some("sqlite:///nonexistent-dir/admix/db.sqlite".to_string()),
            connect_attempts: 2,
            connect_backoff_ms: 1,
            ..DbConfig::default()
        };
        let err = SqlxStore::connect(&cfg)
            .await
            .err()
            .expect("expected connect error");
        match err {
            DataError::Connect { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
