//! Campaign payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use campaignctl_core::validation::{require_max_len, require_non_blank, require_present};
use campaignctl_core::{
    normalize_tags, CampaignDraft, CampaignStatus, Counters, MediaType, TransitionPolicy,
};

use super::{nullable, ValidationError, MAX_NAME_LEN, MAX_URL_LEN};

/// Longest accepted campaign description
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Longest accepted message body
const MAX_MESSAGE_LEN: usize = 4096;

/// Campaign create/update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub message_template: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub target_audience: Option<Vec<String>>,
    /// Absent keeps the stored value, `null` clears it
    #[serde(default, deserialize_with = "nullable")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
}

/// Validated campaign fields. Counters are not part of this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFields {
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub message_template: String,
    pub media_url: String,
    pub media_type: MediaType,
    pub target_audience: Vec<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

impl CampaignInput {
    /// Borrow the wizard view of this payload.
    pub fn draft(&self) -> CampaignDraft<'_> {
        CampaignDraft {
            name: self.name.as_deref().unwrap_or_default(),
            description: self.description.as_deref().unwrap_or_default(),
            message_template: self.message_template.as_deref().unwrap_or_default(),
            target_audience: self.target_audience.as_deref().unwrap_or_default(),
        }
    }

    /// Validate a new campaign. New campaigns may start in any status.
    pub fn into_fields(self) -> Result<CampaignFields, ValidationError> {
        self.draft().validate_for_save()?;

        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => CampaignStatus::default(),
        };

        build(
            self.name.unwrap_or_default(),
            self.description.unwrap_or_default(),
            status,
            self.message_template.unwrap_or_default(),
            self.media_url.unwrap_or_default(),
            self.media_type.as_deref(),
            self.target_audience.unwrap_or_default(),
            self.scheduled_date.flatten(),
        )
    }

    /// Apply the supplied fields over `current`, checking any status change
    /// against `policy`.
    pub fn merge(
        self,
        current: CampaignFields,
        policy: TransitionPolicy,
    ) -> Result<CampaignFields, ValidationError> {
        let status = match self.status.as_deref() {
            Some(s) => current.status.transition(s.parse()?, policy)?,
            None => current.status,
        };
        let media_type = self
            .media_type
            .unwrap_or_else(|| current.media_type.as_str().to_owned());

        let merged = build(
            self.name.unwrap_or(current.name),
            self.description.unwrap_or(current.description),
            status,
            self.message_template.unwrap_or(current.message_template),
            self.media_url.unwrap_or(current.media_url),
            Some(&media_type),
            self.target_audience.unwrap_or(current.target_audience),
            self.scheduled_date.unwrap_or(current.scheduled_date),
        )?;

        CampaignDraft {
            name: &merged.name,
            description: &merged.description,
            message_template: &merged.message_template,
            target_audience: &merged.target_audience,
        }
        .validate_for_save()?;

        Ok(merged)
    }
}

#[allow(clippy::too_many_arguments)]
fn build(
    name: String,
    description: String,
    status: CampaignStatus,
    message_template: String,
    media_url: String,
    media_type: Option<&str>,
    target_audience: Vec<String>,
    scheduled_date: Option<DateTime<Utc>>,
) -> Result<CampaignFields, ValidationError> {
    let name = require_non_blank("name", &name)?;
    require_max_len("name", &name, MAX_NAME_LEN)?;
    let description = require_non_blank("description", &description)?;
    require_max_len("description", &description, MAX_DESCRIPTION_LEN)?;
    let message_template = require_present("messageTemplate", &message_template)?;
    require_max_len("messageTemplate", &message_template, MAX_MESSAGE_LEN)?;

    let media_url = media_url.trim().to_owned();
    require_max_len("mediaUrl", &media_url, MAX_URL_LEN)?;

    let media_type = match media_type {
        Some(t) => t.parse()?,
        None => MediaType::default(),
    };

    Ok(CampaignFields {
        name,
        description,
        status,
        message_template,
        media_url,
        media_type,
        target_audience: normalize_tags(target_audience),
        scheduled_date,
    })
}

/// `PATCH /campaigns/{id}/status` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

impl StatusInput {
    pub fn parse(&self) -> Result<CampaignStatus, ValidationError> {
        match self.status.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse(),
            _ => Err(ValidationError::Empty { field: "status" }),
        }
    }
}

/// Largest count accepted for any one field of a single activity report
pub const MAX_ACTIVITY_COUNT: i64 = 1_000_000_000;

/// `POST /campaigns/{id}/activity` body: delivery counts for one UTC day
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub sent: i64,
    #[serde(default)]
    pub delivered: i64,
    #[serde(default)]
    pub read: i64,
    #[serde(default)]
    pub replied: i64,
}

impl ActivityInput {
    /// Validate counts and resolve the day they belong to.
    pub fn into_counters(self, today: NaiveDate) -> Result<(NaiveDate, Counters), ValidationError> {
        for (field, value) in [
            ("sent", self.sent),
            ("delivered", self.delivered),
            ("read", self.read),
            ("replied", self.replied),
        ] {
            if value < 0 {
                return Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must not be negative",
                });
            }
            if value > MAX_ACTIVITY_COUNT {
                return Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must not exceed 1000000000 per request",
                });
            }
        }

        for (field, value) in [
            ("delivered", self.delivered),
            ("read", self.read),
            ("replied", self.replied),
        ] {
            if value > self.sent {
                return Err(ValidationError::InvalidFormat {
                    field,
                    reason: "must not exceed sent",
                });
            }
        }

        let counters = Counters::new(self.sent, self.delivered, self.read, self.replied);
        if counters.is_zero() {
            return Err(ValidationError::Empty { field: "activity" });
        }

        Ok((self.date.unwrap_or(today), counters))
    }
}
