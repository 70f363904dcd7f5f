//! Repository error type

use campaignctl_core::{ValidationError, DUPLICATE_PHONE_MESSAGE};

/// Message for a registration with an email that is already taken
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violation, with the message shown to clients
    #[error("{message}")]
    Duplicate { message: &'static str },

    /// Write refused by a domain rule checked inside the transaction
    #[error("{0}")]
    Rejected(ValidationError),

    /// Stored value that no longer parses into its domain type
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// SQLSTATE for a value outside the column's numeric range
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Client-caused SQLSTATEs that should surface as a rejected write
fn rejection_for_code(code: &str) -> Option<ValidationError> {
    match code {
        NUMERIC_VALUE_OUT_OF_RANGE => Some(ValidationError::InvalidFormat {
            field: "counters",
            reason: "numeric value out of range",
        }),
        _ => None,
    }
}

/// Unique violations on known constraints become `Duplicate`, numeric
/// overflow becomes `Rejected`; everything else stays a raw sqlx error.
impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if let Some(rejection) = db.code().as_deref().and_then(rejection_for_code) {
                return Self::Rejected(rejection);
            }
            if db.is_unique_violation() {
                match db.constraint() {
                    Some("contacts_phone_key") => {
                        return Self::Duplicate {
                            message: DUPLICATE_PHONE_MESSAGE,
                        }
                    }
                    Some("users_email_key") => {
                        return Self::Duplicate {
                            message: DUPLICATE_EMAIL_MESSAGE,
                        }
                    }
                    _ => {}
                }
            }
        }
        Self::Sqlx(e)
    }
}

impl From<ValidationError> for DbError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidData(e.to_string())
    }
}
