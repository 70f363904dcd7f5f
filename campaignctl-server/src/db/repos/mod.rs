//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool: `XRepo::new(&state.pool)`
//! - Owner-scoped queries for campaigns and templates
//! - Unique violations mapped to `DbError::Duplicate` (no check-then-insert)
//! - Transactions for read-modify-write

pub mod campaigns;
pub mod contacts;
pub mod error;
pub mod sessions;
pub mod templates;
pub mod users;

pub use campaigns::{Campaign, CampaignRepo, CampaignTotals};
pub use contacts::{Contact, ContactCounts, ContactRepo};
pub use error::{DbError, DUPLICATE_EMAIL_MESSAGE};
pub use sessions::SessionRepo;
pub use templates::{Template, TemplateRepo};
pub use users::{User, UserRepo};

/// Substring pattern for `ILIKE`, with `%`, `_` and `\` in the input matched literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_term() {
        assert_eq!(like_pattern("ana"), "%ana%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
