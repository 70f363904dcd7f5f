//! Request payloads and the validated field sets built from them
//!
//! Every create/update payload deserialises into an `*Input` with optional
//! fields. `into_fields` (create) or `merge` (update) turns it into a
//! validated `*Fields` value that repositories write as-is. Invalid input
//! returns `ValidationError`, never a panic.

pub mod campaign;
pub mod contact;
pub mod template;
pub mod user;

pub use campaignctl_core::ValidationError;

pub use campaign::{ActivityInput, CampaignFields, CampaignInput, StatusInput};
pub use contact::{ContactFields, ContactFilter, ContactInput};
pub use template::{TemplateFields, TemplateFilter, TemplateInput};
pub use user::{Credentials, NewUser, PasswordChange, ProfileFields, ProfileInput, Registration};

/// Longest accepted display name (campaigns, templates, contacts, users)
pub(crate) const MAX_NAME_LEN: usize = 200;

/// Longest accepted media URL
pub(crate) const MAX_URL_LEN: usize = 2048;

/// Deserialize a field that distinguishes "absent" (`None`) from `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat `"all"` (any case) and blank strings as "no filter".
pub(crate) fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_value_all_means_none() {
        assert_eq!(filter_value(Some("all")), None);
        assert_eq!(filter_value(Some("ALL")), None);
        assert_eq!(filter_value(Some("  ")), None);
        assert_eq!(filter_value(None), None);
        assert_eq!(filter_value(Some(" active ")), Some("active"));
    }
}
