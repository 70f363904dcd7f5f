//! Analytics endpoints: dashboard overview and per-campaign performance

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use campaignctl_core::analytics::window_start;
use campaignctl_core::{fill_activity, ActivityPoint, Counters, Rates, ACTIVITY_WINDOW_DAYS};

use crate::db::repos::{CampaignRepo, CampaignTotals, ContactCounts, ContactRepo};
use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::http::server::AppState;

/// `GET /analytics` response
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_contacts: i64,
    pub active_contacts: i64,
    pub blocked_contacts: i64,
    pub unsubscribed_contacts: i64,
    pub messages_sent: i64,
    pub messages_delivered: i64,
    pub messages_read: i64,
    pub replies: i64,
    #[serde(flatten)]
    pub rates: Rates,
    /// Last seven UTC days, oldest first
    pub recent_activity: Vec<ActivityPoint>,
}

impl OverviewResponse {
    fn new(campaigns: CampaignTotals, contacts: ContactCounts, activity: Vec<ActivityPoint>) -> Self {
        let c = campaigns.counters;
        Self {
            total_campaigns: campaigns.total,
            active_campaigns: campaigns.active,
            total_contacts: contacts.total,
            active_contacts: contacts.active,
            blocked_contacts: contacts.blocked,
            unsubscribed_contacts: contacts.unsubscribed,
            messages_sent: c.sent,
            messages_delivered: c.delivered,
            messages_read: c.read,
            replies: c.replied,
            rates: c.rates(),
            recent_activity: activity,
        }
    }
}

/// `GET /analytics/campaigns/{id}/performance` response
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub campaign_id: Uuid,
    pub name: String,
    pub status: String,
    pub sent_count: i64,
    pub delivered_count: i64,
    pub read_count: i64,
    pub reply_count: i64,
    #[serde(flatten)]
    pub rates: Rates,
}

impl PerformanceResponse {
    fn new(campaign_id: Uuid, name: String, status: String, c: Counters) -> Self {
        Self {
            campaign_id,
            name,
            status,
            sent_count: c.sent,
            delivered_count: c.delivered,
            read_count: c.read,
            reply_count: c.replied,
            rates: c.rates(),
        }
    }
}

/// The activity window ending today (UTC)
fn activity_window() -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    (window_start(today, ACTIVITY_WINDOW_DAYS), today)
}

/// GET /analytics - totals over the caller's campaigns and all contacts
async fn overview(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<OverviewResponse>, ApiError> {
    let campaigns = CampaignRepo::new(&state.pool);
    let (since, today) = activity_window();

    let totals = campaigns.totals(auth.user.id).await?;
    let contacts = ContactRepo::new(&state.pool).count_by_status().await?;
    let buckets = campaigns.daily_activity(auth.user.id, since).await?;

    let activity = fill_activity(today, ACTIVITY_WINDOW_DAYS, buckets);
    Ok(Json(OverviewResponse::new(totals, contacts, activity)))
}

/// GET /analytics/campaigns/{id}/performance
async fn campaign_performance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let campaign = CampaignRepo::new(&state.pool).get(auth.user.id, id).await?;
    let counters = campaign.counters();
    Ok(Json(PerformanceResponse::new(
        campaign.id,
        campaign.name,
        campaign.status,
        counters,
    )))
}

/// Analytics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics", get(overview))
        .route("/analytics/campaigns/{id}/performance", get(campaign_performance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_with_no_campaigns_has_zero_rates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let activity = fill_activity(today, ACTIVITY_WINDOW_DAYS, Vec::new());
        let response = OverviewResponse::new(
            CampaignTotals::default(),
            ContactCounts::default(),
            activity,
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["deliveryRate"], 0.0);
        assert_eq!(json["openRate"], 0.0);
        assert_eq!(json["responseRate"], 0.0);
        assert_eq!(json["recentActivity"].as_array().unwrap().len(), 7);
        assert_eq!(json["recentActivity"][0]["date"], "2024-05-14");
        assert_eq!(json["recentActivity"][6]["date"], "2024-05-20");
    }

    #[test]
    fn overview_sums_and_rates() {
        let totals = CampaignTotals {
            total: 3,
            active: 1,
            counters: Counters::new(200, 188, 100, 9),
        };
        let contacts = ContactCounts {
            total: 10,
            active: 7,
            blocked: 2,
            unsubscribed: 1,
        };
        let json = serde_json::to_value(OverviewResponse::new(totals, contacts, vec![])).unwrap();
        assert_eq!(json["totalCampaigns"], 3);
        assert_eq!(json["activeCampaigns"], 1);
        assert_eq!(json["blockedContacts"], 2);
        assert_eq!(json["messagesSent"], 200);
        assert_eq!(json["replies"], 9);
        assert_eq!(json["deliveryRate"], 94.0);
        assert_eq!(json["openRate"], 50.0);
        assert_eq!(json["responseRate"], 4.5);
    }

    #[test]
    fn performance_flattens_rates() {
        let id = Uuid::new_v4();
        let response = PerformanceResponse::new(
            id,
            "Spring".into(),
            "active".into(),
            Counters::new(100, 94, 0, 0),
        );
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["campaignId"], id.to_string());
        assert_eq!(json["deliveryRate"], 94.0);
        assert_eq!(json["openRate"], 0.0);
    }

    fn keys(value: &serde_json::Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn overview_field_names() {
        let json = serde_json::to_value(OverviewResponse::new(
            CampaignTotals::default(),
            ContactCounts::default(),
            vec![],
        ))
        .unwrap();
        assert_eq!(
            keys(&json),
            [
                "activeCampaigns",
                "activeContacts",
                "blockedContacts",
                "deliveryRate",
                "messagesDelivered",
                "messagesRead",
                "messagesSent",
                "openRate",
                "recentActivity",
                "replies",
                "responseRate",
                "totalCampaigns",
                "totalContacts",
                "unsubscribedContacts",
            ]
        );
    }

    #[test]
    fn performance_field_names() {
        let json = serde_json::to_value(PerformanceResponse::new(
            Uuid::new_v4(),
            "Spring".into(),
            "draft".into(),
            Counters::default(),
        ))
        .unwrap();
        assert_eq!(
            keys(&json),
            [
                "campaignId",
                "deliveredCount",
                "deliveryRate",
                "name",
                "openRate",
                "readCount",
                "replyCount",
                "responseRate",
                "sentCount",
                "status",
            ]
        );
    }
}
