//! Template endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::MessageResponse;
use crate::db::repos::{Template, TemplateRepo};
use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{TemplateFilter, TemplateInput};

/// Template owner summary
#[derive(Debug, Serialize)]
pub struct TemplateOwner {
    pub id: Uuid,
    pub name: String,
}

/// Template response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub media_url: String,
    pub media_type: String,
    pub variables: Vec<String>,
    pub category: String,
    pub created_by: TemplateOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Template> for TemplateResponse {
    fn from(t: Template) -> Self {
        Self {
            id: t.id,
            name: t.name,
            content: t.content,
            media_url: t.media_url,
            media_type: t.media_type,
            variables: t.variables,
            category: t.category,
            created_by: TemplateOwner {
                id: t.created_by,
                name: t.created_by_name,
            },
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// GET /templates?search=&category=
async fn list_templates(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(filter): Query<TemplateFilter>,
) -> Result<Json<Vec<TemplateResponse>>, ApiError> {
    let category = filter.category()?;
    let templates = TemplateRepo::new(&state.pool)
        .list(auth.user.id, filter.search(), category)
        .await?;
    Ok(Json(
        templates.into_iter().map(TemplateResponse::from).collect(),
    ))
}

/// POST /templates - variables are derived from content
async fn create_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidJson(req): ValidJson<TemplateInput>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let fields = req.into_fields()?;
    let template = TemplateRepo::new(&state.pool)
        .create(auth.user.id, &fields)
        .await?;
    tracing::info!(
        template_id = %template.id,
        variables = template.variables.len(),
        "template created"
    );

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// GET /templates/{id}
async fn get_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = TemplateRepo::new(&state.pool).get(auth.user.id, id).await?;
    Ok(Json(TemplateResponse::from(template)))
}

/// PUT /templates/{id} - partial update, variables recomputed
async fn update_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<TemplateInput>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let repo = TemplateRepo::new(&state.pool);
    let current = repo.get(auth.user.id, id).await?;
    let fields = req.merge(current.fields()?)?;
    let template = repo.update(auth.user.id, id, &fields).await?;

    Ok(Json(TemplateResponse::from(template)))
}

/// DELETE /templates/{id}
async fn delete_template(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    TemplateRepo::new(&state.pool).delete(auth.user.id, id).await?;
    tracing::info!(template_id = %id, "template deleted");
    Ok(MessageResponse::new("Template deleted successfully"))
}

/// Template routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
}
