//! Category management, persisted through the admix data layer.
//!
//! Transport and form validation live elsewhere; this crate stops at the
//! datasource/service boundary.

pub mod datasource;
pub mod entities;
pub mod models;
pub mod service;

pub use datasource::{CategoryFilters, CategoryRepo};
pub use entities::{Category, STATUS_DRAFT, STATUS_PUBLISHED};
pub use models::CategoryRecord;
pub use service::{CategoryInput, CategoryService};
