//! Campaign repository
//!
//! Every query is scoped to the owning user: another user's campaign is
//! reported as not found. Handles:
//! - Create via CTE + JOIN so the owner's name comes back in one round trip
//! - Status changes under `SELECT ... FOR UPDATE`
//! - Activity recording that bumps counters and the day bucket atomically

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use campaignctl_core::{CampaignStatus, Counters, TransitionPolicy};

use super::DbError;
use crate::models::CampaignFields;

/// Campaign record joined with its owner
#[derive(Debug, Clone, FromRow)]
pub struct Campaign {
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
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn counters(&self) -> Counters {
        Counters::new(
            self.sent_count,
            self.delivered_count,
            self.read_count,
            self.reply_count,
        )
    }

    /// Stored values as validated fields, the starting point of an update.
    pub fn fields(&self) -> Result<CampaignFields, DbError> {
        Ok(CampaignFields {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status.parse()?,
            message_template: self.message_template.clone(),
            media_url: self.media_url.clone(),
            media_type: self.media_type.parse()?,
            target_audience: self.target_audience.clone(),
            scheduled_date: self.scheduled_date,
        })
    }
}

/// Campaign totals for the analytics overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignTotals {
    pub total: i64,
    pub active: i64,
    pub counters: Counters,
}

/// Joined projection shared by every read
const CAMPAIGN_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.status, c.message_template,
           c.media_url, c.media_type, c.target_audience, c.scheduled_date,
           c.sent_count, c.delivered_count, c.read_count, c.reply_count,
           c.created_by, u.name AS created_by_name, u.email AS created_by_email,
           c.created_at, c.updated_at
"#;

/// Campaign repository
pub struct CampaignRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CampaignRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Owner's campaigns, newest first.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Campaign>, DbError> {
        let sql = format!(
            "{CAMPAIGN_SELECT} FROM campaigns c JOIN users u ON u.id = c.created_by \
             WHERE c.created_by = $1 ORDER BY c.created_at DESC, c.id"
        );
        let campaigns = sqlx::query_as::<_, Campaign>(&sql)
            .bind(owner)
            .fetch_all(self.pool)
            .await?;
        Ok(campaigns)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Campaign, DbError> {
        let sql = format!(
            "{CAMPAIGN_SELECT} FROM campaigns c JOIN users u ON u.id = c.created_by \
             WHERE c.id = $1 AND c.created_by = $2"
        );
        sqlx::query_as::<_, Campaign>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("campaign", id))
    }

    /// Insert a campaign with zeroed counters.
    pub async fn create(&self, owner: Uuid, fields: &CampaignFields) -> Result<Campaign, DbError> {
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO campaigns (name, description, status, message_template,
                                       media_url, media_type, target_audience,
                                       scheduled_date, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            {CAMPAIGN_SELECT} FROM c JOIN users u ON u.id = c.created_by
            "#
        );
        let created = sqlx::query_as::<_, Campaign>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.status.as_str())
            .bind(&fields.message_template)
            .bind(&fields.media_url)
            .bind(fields.media_type.as_str())
            .bind(&fields.target_audience)
            .bind(fields.scheduled_date)
            .bind(owner)
            .fetch_one(self.pool)
            .await?;
        Ok(created)
    }

    /// Overwrite the editable fields. Counters are untouched.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &CampaignFields,
    ) -> Result<Campaign, DbError> {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE campaigns
                SET name = $3, description = $4, status = $5, message_template = $6,
                    media_url = $7, media_type = $8, target_audience = $9,
                    scheduled_date = $10, updated_at = NOW()
                WHERE id = $1 AND created_by = $2
                RETURNING *
            )
            {CAMPAIGN_SELECT} FROM c JOIN users u ON u.id = c.created_by
            "#
        );
        sqlx::query_as::<_, Campaign>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.status.as_str())
            .bind(&fields.message_template)
            .bind(&fields.media_url)
            .bind(fields.media_type.as_str())
            .bind(&fields.target_audience)
            .bind(fields.scheduled_date)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("campaign", id))
    }

    /// Delete a campaign; its activity rows go with it.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("campaign", id));
        }
        Ok(())
    }

    /// Change status only, checking the move against `policy` while the row is locked.
    pub async fn set_status(
        &self,
        owner: Uuid,
        id: Uuid,
        next: CampaignStatus,
        policy: TransitionPolicy,
    ) -> Result<Campaign, DbError> {
        let mut tx = self.pool.begin().await?;

        let current: String = sqlx::query_scalar(
            "SELECT status FROM campaigns WHERE id = $1 AND created_by = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("campaign", id))?;

        let current: CampaignStatus = current.parse()?;
        let next = current
            .transition(next, policy)
            .map_err(DbError::Rejected)?;

        sqlx::query("UPDATE campaigns SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(next.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(owner, id).await
    }

    /// Add delivery counts for `day` to the campaign and its day bucket.
    pub async fn record_activity(
        &self,
        owner: Uuid,
        id: Uuid,
        day: NaiveDate,
        counters: Counters,
    ) -> Result<Campaign, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE campaigns
            SET sent_count = sent_count + $3,
                delivered_count = delivered_count + $4,
                read_count = read_count + $5,
                reply_count = reply_count + $6,
                updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(counters.sent)
        .bind(counters.delivered)
        .bind(counters.read)
        .bind(counters.replied)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::not_found("campaign", id));
        }

        sqlx::query(
            r#"
            INSERT INTO campaign_activity
                (campaign_id, day, sent_count, delivered_count, read_count, reply_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (campaign_id, day) DO UPDATE SET
                sent_count = campaign_activity.sent_count + EXCLUDED.sent_count,
                delivered_count = campaign_activity.delivered_count + EXCLUDED.delivered_count,
                read_count = campaign_activity.read_count + EXCLUDED.read_count,
                reply_count = campaign_activity.reply_count + EXCLUDED.reply_count
            "#,
        )
        .bind(id)
        .bind(day)
        .bind(counters.sent)
        .bind(counters.delivered)
        .bind(counters.read)
        .bind(counters.replied)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(owner, id).await
    }

    /// Campaign count, active count and summed counters for an owner.
    pub async fn totals(&self, owner: Uuid) -> Result<CampaignTotals, DbError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'active') AS active,
                   COALESCE(SUM(sent_count), 0)::BIGINT AS sent,
                   COALESCE(SUM(delivered_count), 0)::BIGINT AS delivered,
                   COALESCE(SUM(read_count), 0)::BIGINT AS read,
                   COALESCE(SUM(reply_count), 0)::BIGINT AS replied
            FROM campaigns
            WHERE created_by = $1
            "#,
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(CampaignTotals {
            total: row.get("total"),
            active: row.get("active"),
            counters: Counters::new(
                row.get("sent"),
                row.get("delivered"),
                row.get("read"),
                row.get("replied"),
            ),
        })
    }

    /// Per-day sums of the owner's activity from `since` on. Days without rows are absent.
    pub async fn daily_activity(
        &self,
        owner: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Counters)>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT a.day,
                   SUM(a.sent_count)::BIGINT AS sent,
                   SUM(a.delivered_count)::BIGINT AS delivered,
                   SUM(a.read_count)::BIGINT AS read,
                   SUM(a.reply_count)::BIGINT AS replied
            FROM campaign_activity a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE c.created_by = $1 AND a.day >= $2
            GROUP BY a.day
            ORDER BY a.day
            "#,
        )
        .bind(owner)
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.get("day"),
                    Counters::new(
                        row.get("sent"),
                        row.get("delivered"),
                        row.get("read"),
                        row.get("replied"),
                    ),
                )
            })
            .collect())
    }
}
