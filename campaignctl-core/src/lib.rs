//! campaignctl-core: domain logic for the campaign management service
//!
//! Pure functions and value types shared by the HTTP server and the CLI.
//! Nothing here touches the database or the network.

pub mod analytics;
pub mod campaign;
pub mod config;
pub mod contact;
pub mod error;
pub mod import;
pub mod media;
pub mod template;
pub mod validation;
pub mod variables;
pub mod wizard;

pub use analytics::{fill_activity, rate, ActivityPoint, Counters, Rates, ACTIVITY_WINDOW_DAYS};
pub use campaign::{CampaignStatus, TransitionPolicy};
pub use config::CampaignConfig;
pub use contact::{normalize_email, normalize_phone, normalize_tags, ContactStatus};
pub use error::{CoreError, Result};
pub use import::{BulkImportReport, ImportFailure, DUPLICATE_PHONE_MESSAGE};
pub use media::{classify_mime, MediaType};
pub use template::TemplateCategory;
pub use validation::ValidationError;
pub use variables::extract_variables;
pub use wizard::{CampaignDraft, StepReport, WizardStep};
