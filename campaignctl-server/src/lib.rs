//! campaignctl-server: REST backend for the campaign manager
//!
//! Layers:
//! - `models`: request payloads and their validation
//! - `db`: connection pool, schema migrations, repositories
//! - `http`: axum router, bearer auth, error mapping, route handlers

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, run_migrations, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerError};
