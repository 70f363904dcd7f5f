//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One bounded PgPool shared through `AppState`
//! - Uniqueness lives in the schema; repositories map violations, never check-then-insert
//! - List queries JOIN what they display (no N+1)
//! - Transactions for read-modify-write and multi-table writes

pub mod migrations;
pub mod pool;
pub mod repos;

pub use migrations::run_migrations;
pub use pool::{create_pool, pool_options};
pub use repos::*;
