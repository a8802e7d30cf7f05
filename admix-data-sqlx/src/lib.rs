//! # admix-data-sqlx — SQLx backend for the admix data layer
//!
//! This crate executes the abstract contracts of [`admix-data`] against a
//! relational database through SQLx's `Any` driver.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxStore`] | Owns the pool and the single store-wide transaction; hands out query handles |
//! | [`SqlxRepository`] | Generic repository implementing `Repository<E, Id>` for any [`SqlxModel`] |
//! | [`SqlxModel`] | Bridge trait: `Model` + `FromRow` + related-row attachment |
//! | [`SqlBuilder`] / [`Dialect`] | Statement assembly: placeholder styles, list expansion |
//! | [`DbConfig`] | Connection settings from serde sources or `DB_*` environment variables |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` |
//!
//! # Feature flags
//!
//! Enable the driver for your database:
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```ignore
//! use admix_data::prelude::*;
//! use admix_data_sqlx::{DbConfig, SqlxRepository, SqlxStore};
//!
//! let store = Arc::new(SqlxStore::connect(&DbConfig::from_env()).await?);
//! let categories = SqlxRepository::<CategoryRecord>::new(store.clone());
//!
//! store.begin().await?;
//! match categories.insert(&category).await {
//!     Ok(created) => store.commit().await?,
//!     Err(err) => store.rollback().await?,
//! }
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod sql;
pub mod store;
pub mod time;

pub use config::DbConfig;
pub use error::{SqlxErrorExt, SqlxResult};
pub use repository::{SqlxModel, SqlxRepository};
pub use sql::{Dialect, SqlBuilder};
pub use store::{QueryHandle, SqlxStore};

/// Re-exports of the most commonly used types from both `admix-data` and
/// this crate.
pub mod prelude {
    pub use crate::{DbConfig, SqlxErrorExt, SqlxModel, SqlxRepository, SqlxStore};
    pub use admix_data::prelude::*;
}
