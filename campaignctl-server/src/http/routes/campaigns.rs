//! Campaign endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use campaignctl_core::{StepReport, WizardStep};

use super::MessageResponse;
use crate::db::repos::{Campaign, CampaignRepo};
use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{ActivityInput, CampaignInput, StatusInput};

/// Campaign owner summary
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Campaign response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub message_template: String,
    pub media_url: String,
    pub media_type: String,
    pub target_audience: Vec<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub sent_count: i64,
    pub delivered_count: i64,
    pub read_count: i64,
    pub reply_count: i64,
    pub created_by: OwnerResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignResponse {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            status: c.status,
            message_template: c.message_template,
            media_url: c.media_url,
            media_type: c.media_type,
            target_audience: c.target_audience,
            scheduled_date: c.scheduled_date,
            sent_count: c.sent_count,
            delivered_count: c.delivered_count,
            read_count: c.read_count,
            reply_count: c.reply_count,
            created_by: OwnerResponse {
                id: c.created_by,
                name: c.created_by_name,
                email: c.created_by_email,
            },
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Wizard validation result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Every step passes
    pub valid: bool,
    /// The steps required to store the campaign pass
    pub can_save: bool,
    pub steps: Vec<StepReport>,
}

/// GET /campaigns - caller's campaigns, newest first
async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<CampaignResponse>>, ApiError> {
    let campaigns = CampaignRepo::new(&state.pool).list(auth.user.id).await?;
    Ok(Json(
        campaigns.into_iter().map(CampaignResponse::from).collect(),
    ))
}

/// POST /campaigns
async fn create_campaign(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CampaignInput>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    let fields = req.into_fields()?;
    let campaign = CampaignRepo::new(&state.pool)
        .create(auth.user.id, &fields)
        .await?;
    tracing::info!(campaign_id = %campaign.id, status = %campaign.status, "campaign created");

    Ok((StatusCode::CREATED, Json(CampaignResponse::from(campaign))))
}

/// POST /campaigns/validate - per-step wizard validation, nothing is stored
async fn validate_campaign(
    _auth: AuthUser,
    ValidJson(req): ValidJson<CampaignInput>,
) -> Json<ValidationResponse> {
    let draft = req.draft();
    let steps = draft.validate_steps();

    let can_save = WizardStep::ALL
        .iter()
        .zip(&steps)
        .filter(|(step, _)| step.required_for_save())
        .all(|(_, report)| report.valid);

    Json(ValidationResponse {
        valid: steps.iter().all(|s| s.valid),
        can_save,
        steps,
    })
}

/// GET /campaigns/{id}
async fn get_campaign(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<CampaignResponse>, ApiError> {
    let campaign = CampaignRepo::new(&state.pool).get(auth.user.id, id).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// PUT /campaigns/{id} - partial update; counters cannot be set here
async fn update_campaign(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<CampaignInput>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let repo = CampaignRepo::new(&state.pool);
    let current = repo.get(auth.user.id, id).await?;

    let fields = req.merge(
        current.fields()?,
        state.config.campaigns.transition_policy(),
    )?;
    let campaign = repo.update(auth.user.id, id, &fields).await?;

    Ok(Json(CampaignResponse::from(campaign)))
}

/// DELETE /campaigns/{id}
async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    CampaignRepo::new(&state.pool).delete(auth.user.id, id).await?;
    tracing::info!(campaign_id = %id, "campaign deleted");
    Ok(MessageResponse::new("Campaign deleted successfully"))
}

/// PATCH /campaigns/{id}/status
async fn update_status(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<StatusInput>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let next = req.parse()?;
    let campaign = CampaignRepo::new(&state.pool)
        .set_status(
            auth.user.id,
            id,
            next,
            state.config.campaigns.transition_policy(),
        )
        .await?;
    tracing::info!(campaign_id = %id, status = %next, "campaign status updated");

    Ok(Json(CampaignResponse::from(campaign)))
}

/// POST /campaigns/{id}/activity - add delivery counts for one day
async fn record_activity(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<ActivityInput>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let (day, counters) = req.into_counters(Utc::now().date_naive())?;
    let campaign = CampaignRepo::new(&state.pool)
        .record_activity(auth.user.id, id, day, counters)
        .await?;
    tracing::info!(campaign_id = %id, %day, sent = counters.sent, "campaign activity recorded");

    Ok(Json(CampaignResponse::from(campaign)))
}

/// Campaign routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/validate", post(validate_campaign))
        .route(
            "/campaigns/{id}",
            get(get_campaign).put(update_campaign).delete(delete_campaign),
        )
        .route("/campaigns/{id}/status", patch(update_status))
        .route("/campaigns/{id}/activity", post(record_activity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            name: "Spring sale".into(),
            description: "20% off".into(),
            status: "draft".into(),
            message_template: "Hi {{name}}".into(),
            media_url: String::new(),
            media_type: String::new(),
            target_audience: vec!["vip".into()],
            scheduled_date: None,
            sent_count: 0,
            delivered_count: 0,
            read_count: 0,
            reply_count: 0,
            created_by: Uuid::new_v4(),
            created_by_name: "Ana".into(),
            created_by_email: "ana@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn response_uses_camel_case() {
        let json = serde_json::to_value(CampaignResponse::from(campaign())).unwrap();
        assert_eq!(json["messageTemplate"], "Hi {{name}}");
        assert_eq!(json["sentCount"], 0);
        assert_eq!(json["mediaType"], "");
        assert_eq!(json["createdBy"]["name"], "Ana");
        assert!(json["scheduledDate"].is_null());
    }
}
