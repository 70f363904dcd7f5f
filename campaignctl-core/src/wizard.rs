//! Campaign creation wizard validation
//!
//! The admin UI walks through four steps; each is validated on its own so a
//! client can tell which step still needs input.

use serde::Serialize;

use crate::validation::ValidationError;

/// Wizard steps, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    BasicInfo,
    MessageAndMedia,
    Audience,
    Schedule,
}

impl WizardStep {
    pub const ALL: [Self; 4] = [
        Self::BasicInfo,
        Self::MessageAndMedia,
        Self::Audience,
        Self::Schedule,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::MessageAndMedia => 2,
            Self::Audience => 3,
            Self::Schedule => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::MessageAndMedia => "Message & Media",
            Self::Audience => "Audience",
            Self::Schedule => "Schedule",
        }
    }

    /// Steps that must pass before a campaign can be stored
    pub fn required_for_save(&self) -> bool {
        matches!(self, Self::BasicInfo | Self::MessageAndMedia)
    }
}

/// Fields the wizard collects, borrowed from whatever request carries them
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignDraft<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub message_template: &'a str,
    pub target_audience: &'a [String],
}

/// Per-step result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: u8,
    pub title: &'static str,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CampaignDraft<'_> {
    pub fn validate_step(&self, step: WizardStep) -> Result<(), ValidationError> {
        match step {
            WizardStep::BasicInfo => {
                if self.name.trim().is_empty() {
                    return Err(ValidationError::Empty { field: "name" });
                }
                if self.description.trim().is_empty() {
                    return Err(ValidationError::Empty {
                        field: "description",
                    });
                }
                Ok(())
            }
            WizardStep::MessageAndMedia => {
                if self.message_template.trim().is_empty() {
                    return Err(ValidationError::Empty {
                        field: "messageTemplate",
                    });
                }
                Ok(())
            }
            WizardStep::Audience => {
                if self.target_audience.iter().all(|t| t.trim().is_empty()) {
                    return Err(ValidationError::Empty {
                        field: "targetAudience",
                    });
                }
                Ok(())
            }
            WizardStep::Schedule => Ok(()),
        }
    }

    pub fn validate_steps(&self) -> Vec<StepReport> {
        WizardStep::ALL
            .into_iter()
            .map(|step| {
                let result = self.validate_step(step);
                StepReport {
                    step: step.number(),
                    title: step.title(),
                    valid: result.is_ok(),
                    message: result.err().map(|e| e.to_string()),
                }
            })
            .collect()
    }

    /// Check the steps a stored campaign cannot do without.
    pub fn validate_for_save(&self) -> Result<(), ValidationError> {
        WizardStep::ALL
            .into_iter()
            .filter(WizardStep::required_for_save)
            .try_for_each(|step| self.validate_step(step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audience(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn complete_draft_is_valid() {
        let tags = audience(&["vip"]);
        let draft = CampaignDraft {
            name: "Spring sale",
            description: "20% off",
            message_template: "Hi {{name}}",
            target_audience: &tags,
        };
        assert!(draft.validate_steps().iter().all(|s| s.valid));
        assert!(draft.validate_for_save().is_ok());
    }

    #[test]
    fn reports_each_step() {
        let draft = CampaignDraft {
            name: "Spring sale",
            description: "  ",
            message_template: "",
            target_audience: &[],
        };
        let reports = draft.validate_steps();
        assert_eq!(reports.len(), 4);
        assert!(!reports[0].valid);
        assert_eq!(reports[0].message.as_deref(), Some("description cannot be empty"));
        assert!(!reports[1].valid);
        assert!(!reports[2].valid);
        assert!(reports[3].valid);
        assert_eq!(reports[3].title, "Schedule");
    }

    #[test]
    fn audience_not_required_for_save() {
        let draft = CampaignDraft {
            name: "n",
            description: "d",
            message_template: "m",
            target_audience: &[],
        };
        assert!(draft.validate_step(WizardStep::Audience).is_err());
        assert!(draft.validate_for_save().is_ok());
    }

    #[test]
    fn blank_audience_tags_do_not_count() {
        let tags = audience(&[" ", ""]);
        let draft = CampaignDraft {
            target_audience: &tags,
            ..Default::default()
        };
        assert!(draft.validate_step(WizardStep::Audience).is_err());
    }

    #[test]
    fn save_reports_first_missing_field() {
        let draft = CampaignDraft {
            name: "",
            description: "",
            message_template: "",
            target_audience: &[],
        };
        assert_eq!(
            draft.validate_for_save().unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }
}
