//! Contact payloads

use chrono::{DateTime, Utc};
use serde::Deserialize;

use campaignctl_core::validation::{require_max_len, require_non_blank};
use campaignctl_core::{normalize_email, normalize_phone, normalize_tags, ContactStatus};

use super::{filter_value, ValidationError, MAX_NAME_LEN};

/// Contact create/update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Validated contact fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub status: ContactStatus,
    /// `None` lets the database default to now
    pub last_activity: Option<DateTime<Utc>>,
}

impl ContactInput {
    /// Validate a new contact. Name and phone are required.
    ///
    /// # Example
    /// ```
    /// use campaignctl_server::models::ContactInput;
    ///
    /// let input = ContactInput {
    ///     name: Some("Ana".into()),
    ///     phone: Some(" +34 600 000 000 ".into()),
    ///     ..Default::default()
    /// };
    /// let fields = input.into_fields().unwrap();
    /// assert_eq!(fields.phone, "+34 600 000 000");
    /// ```
    pub fn into_fields(self) -> Result<ContactFields, ValidationError> {
        let name = self.name.unwrap_or_default();
        let phone = self.phone.unwrap_or_default();
        build(
            &name,
            &phone,
            self.email.as_deref(),
            self.tags.unwrap_or_default(),
            self.status.as_deref(),
            self.last_activity,
        )
    }

    /// Apply the supplied fields over `current`. An empty `email` clears it.
    pub fn merge(self, current: ContactFields) -> Result<ContactFields, ValidationError> {
        let name = self.name.unwrap_or(current.name);
        let phone = self.phone.unwrap_or(current.phone);
        let email = match self.email {
            Some(email) => Some(email),
            None => current.email,
        };
        let status = self
            .status
            .unwrap_or_else(|| current.status.as_str().to_owned());

        build(
            &name,
            &phone,
            email.as_deref(),
            self.tags.unwrap_or(current.tags),
            Some(&status),
            self.last_activity.or(current.last_activity),
        )
    }
}

fn build(
    name: &str,
    phone: &str,
    email: Option<&str>,
    tags: Vec<String>,
    status: Option<&str>,
    last_activity: Option<DateTime<Utc>>,
) -> Result<ContactFields, ValidationError> {
    let name = require_non_blank("name", name)?;
    require_max_len("name", &name, MAX_NAME_LEN)?;

    let status = match status {
        Some(s) => s.parse()?,
        None => ContactStatus::default(),
    };

    Ok(ContactFields {
        name,
        phone: normalize_phone(phone)?,
        email: normalize_email(email)?,
        tags: normalize_tags(tags),
        status,
        last_activity,
    })
}

/// `GET /contacts` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ContactFilter {
    pub fn search(&self) -> Option<&str> {
        filter_value(self.search.as_deref())
    }

    /// Parsed status filter; `all` or blank means none.
    pub fn status(&self) -> Result<Option<ContactStatus>, ValidationError> {
        filter_value(self.status.as_deref())
            .map(str::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, phone: &str) -> ContactInput {
        ContactInput {
            name: Some(name.into()),
            phone: Some(phone.into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_defaults() {
        let fields = input("Ana", "+15550100").into_fields().unwrap();
        assert_eq!(fields.status, ContactStatus::Active);
        assert!(fields.tags.is_empty());
        assert_eq!(fields.email, None);
        assert_eq!(fields.last_activity, None);
    }

    #[test]
    fn create_requires_name_and_phone() {
        let err = ContactInput::default().into_fields().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });

        let err = ContactInput {
            name: Some("Ana".into()),
            ..Default::default()
        }
        .into_fields()
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "phone" });
    }

    #[test]
    fn create_rejects_unknown_status() {
        let mut req = input("Ana", "+15550100");
        req.status = Some("vip".into());
        assert!(matches!(
            req.into_fields(),
            Err(ValidationError::InvalidVariant { field: "status", .. })
        ));
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let mut base = input("Ana", "+15550100");
        base.email = Some("ana@example.com".into());
        base.tags = Some(vec!["vip".into()]);
        let current = base.into_fields().unwrap();

        let patch = ContactInput {
            status: Some("blocked".into()),
            ..Default::default()
        };
        let merged = patch.merge(current.clone()).unwrap();

        assert_eq!(merged.name, current.name);
        assert_eq!(merged.phone, current.phone);
        assert_eq!(merged.email.as_deref(), Some("ana@example.com"));
        assert_eq!(merged.tags, vec!["vip"]);
        assert_eq!(merged.status, ContactStatus::Blocked);
    }

    #[test]
    fn merge_empty_email_clears() {
        let mut base = input("Ana", "+15550100");
        base.email = Some("ana@example.com".into());
        let current = base.into_fields().unwrap();

        let patch = ContactInput {
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(patch.merge(current).unwrap().email, None);
    }

    #[test]
    fn filter_parsing() {
        let filter = ContactFilter {
            search: Some("  ".into()),
            status: Some("all".into()),
        };
        assert_eq!(filter.search(), None);
        assert_eq!(filter.status().unwrap(), None);

        let filter = ContactFilter {
            search: Some("ana".into()),
            status: Some("unsubscribed".into()),
        };
        assert_eq!(filter.search(), Some("ana"));
        assert_eq!(filter.status().unwrap(), Some(ContactStatus::Unsubscribed));

        let filter = ContactFilter {
            search: None,
            status: Some("gone".into()),
        };
        assert!(filter.status().is_err());
    }
}
