//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod contacts;
pub mod health;
pub mod templates;
pub mod upload;

/// Everything mounted under `/api`. Only `/auth/register` and `/auth/login`
/// are reachable without a bearer token.
pub fn api_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth::router())
        .merge(campaigns::router())
        .merge(contacts::router())
        .merge(templates::router())
        .merge(analytics::router())
        .merge(upload::router(max_upload_bytes))
}

/// `{"message": "..."}` body used by delete and logout responses
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> axum::Json<Self> {
        axum::Json(Self {
            message: message.into(),
        })
    }
}
