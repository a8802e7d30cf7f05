//! Admin accounts and access tokens, persisted through the admix data layer.
//!
//! Transport, token issuance, and password hashing live elsewhere; this
//! crate stops at the datasource boundary.

pub mod datasource;
pub mod entities;
pub mod models;

pub use datasource::{AdminRepo, TokenRepo};
pub use entities::{AccessToken, Admin};
pub use models::{AccessTokenRecord, AdminRecord};
