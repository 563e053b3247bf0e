//! Database module: models, schema and queries for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the `CareStorage` handle
//! - `accounts.rs`, `profiles.rs`, `donations.rs`: queries grouped by table

pub mod accounts;
pub mod donations;
pub mod models;
pub mod profiles;
pub mod schema;
pub mod sqlite;

pub use models::{DbAccount, DbDonationRequest, DbDonor, DbOrphanage, DbRequirement, DbSession};
pub use schema::SQLITE_INIT;
pub use sqlite::{CareStorage, SqlitePool};
