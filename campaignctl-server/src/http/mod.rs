//! HTTP server layer
//!
//! Axum server with:
//! - Bearer-token auth on every `/api` resource
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod auth;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use auth::AuthUser;
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
