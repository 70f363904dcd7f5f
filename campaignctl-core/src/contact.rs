//! Contact status and field normalisation

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::{require_max_len, require_non_blank, ValidationError};

const MAX_PHONE_LEN: usize = 32;
const MAX_EMAIL_LEN: usize = 254;

/// Loose shape check: something@something.tld, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Digits with optional leading `+` and common separators
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-.]*$").expect("invalid phone regex"));

/// Contact status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Active,
    Blocked,
    Unsubscribed,
}

impl ContactStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Blocked, Self::Unsubscribed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Unsubscribed => "unsubscribed",
        }
    }
}

impl FromStr for ContactStatus {
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

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trimmed phone number. Uniqueness is compared on this exact form.
pub fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = require_non_blank("phone", raw)?;
    require_max_len("phone", &phone, MAX_PHONE_LEN)?;

    if !PHONE_RE.is_match(&phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: "must contain digits with optional leading '+'",
        });
    }

    Ok(phone)
}

/// Trimmed, lowercased email. Blank input means "no email".
pub fn normalize_email(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(email) = raw.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };

    require_max_len("email", email, MAX_EMAIL_LEN)?;
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        });
    }

    Ok(Some(email.to_lowercase()))
}

/// Trim tags, drop blanks and repeats (first occurrence wins).
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse() {
        assert_eq!("blocked".parse::<ContactStatus>().unwrap(), ContactStatus::Blocked);
        assert!("deleted".parse::<ContactStatus>().is_err());
        assert_eq!(ContactStatus::default(), ContactStatus::Active);
    }

    #[test]
    fn phone_is_trimmed() {
        assert_eq!(normalize_phone("  +1 555 0100 ").unwrap(), "+1 555 0100");
    }

    #[test]
    fn phone_rejects_letters_and_blank() {
        assert!(matches!(
            normalize_phone("call me"),
            Err(ValidationError::InvalidFormat { field: "phone", .. })
        ));
        assert!(matches!(
            normalize_phone("   "),
            Err(ValidationError::Empty { field: "phone" })
        ));
    }

    #[test]
    fn email_lowercased() {
        assert_eq!(
            normalize_email(Some(" Ana@Example.COM ")).unwrap(),
            Some("ana@example.com".to_owned())
        );
    }

    #[test]
    fn blank_email_is_none() {
        assert_eq!(normalize_email(Some("  ")).unwrap(), None);
        assert_eq!(normalize_email(None).unwrap(), None);
    }

    #[test]
    fn invalid_email() {
        assert!(normalize_email(Some("not-an-email")).is_err());
        assert!(normalize_email(Some("a b@c.d")).is_err());
    }

    #[test]
    fn tags_deduplicated() {
        let tags = normalize_tags(["vip", " vip ", "", "new", "vip"]);
        assert_eq!(tags, vec!["vip", "new"]);
    }
}
