//! Campaign lifecycle status
//!
//! Status is set by direct client request. The transition graph below is only
//! consulted under [`TransitionPolicy::Enforced`]; the default policy accepts
//! any move, including `completed -> draft`.
//!
//! ```text
//! draft ──> scheduled ──> active <──> paused
//!   │  <──────┘             │           │
//!   └───────────────────────┘           │
//!                           └──> completed <┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Campaign status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Active,
    Completed,
    Paused,
}

/// Whether status updates must follow the transition graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may follow any other
    #[default]
    Unrestricted,
    /// Only edges of the transition graph are accepted
    Enforced,
}

impl CampaignStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Scheduled,
        Self::Active,
        Self::Completed,
        Self::Paused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    /// Edge check against the transition graph. Staying put is always allowed.
    pub fn can_transition_to(self, next: Self) -> bool {
        use CampaignStatus::*;

        if self == next {
            return true;
        }

        matches!(
            (self, next),
            (Draft, Scheduled)
                | (Draft, Active)
                | (Scheduled, Active)
                | (Scheduled, Draft)
                | (Active, Paused)
                | (Paused, Active)
                | (Active, Completed)
                | (Paused, Completed)
        )
    }

    /// Resolve a requested status change under `policy`.
    pub fn transition(self, next: Self, policy: TransitionPolicy) -> Result<Self, ValidationError> {
        match policy {
            TransitionPolicy::Unrestricted => Ok(next),
            TransitionPolicy::Enforced if self.can_transition_to(next) => Ok(next),
            TransitionPolicy::Enforced => Err(ValidationError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            }),
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CampaignStatus::*;

    #[test]
    fn parse_round_trip() {
        for status in CampaignStatus::ALL {
            assert_eq!(status.as_str().parse::<CampaignStatus>().unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "archived".parse::<CampaignStatus>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "status", .. }));
    }

    #[test]
    fn unrestricted_allows_anything() {
        assert_eq!(
            Completed.transition(Draft, TransitionPolicy::Unrestricted).unwrap(),
            Draft
        );
        assert_eq!(
            Paused.transition(Scheduled, TransitionPolicy::Unrestricted).unwrap(),
            Scheduled
        );
    }

    #[test]
    fn enforced_follows_graph() {
        let policy = TransitionPolicy::Enforced;
        assert_eq!(Draft.transition(Scheduled, policy).unwrap(), Scheduled);
        assert_eq!(Scheduled.transition(Active, policy).unwrap(), Active);
        assert_eq!(Active.transition(Paused, policy).unwrap(), Paused);
        assert_eq!(Paused.transition(Active, policy).unwrap(), Active);
        assert_eq!(Paused.transition(Completed, policy).unwrap(), Completed);

        let err = Completed.transition(Draft, policy).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTransition {
                from: "completed",
                to: "draft"
            }
        );
        assert!(Draft.transition(Paused, policy).is_err());
    }

    #[test]
    fn same_state_is_noop() {
        for status in CampaignStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn completed_is_terminal() {
        for next in [Draft, Scheduled, Active, Paused] {
            assert!(!Completed.can_transition_to(next), "completed -> {next}");
        }
        assert!(Active.can_transition_to(Paused));
        assert!(Active.can_transition_to(Completed));
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Paused).unwrap(), "\"paused\"");
        assert_eq!(CampaignStatus::default(), Draft);
    }
}
