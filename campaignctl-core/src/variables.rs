//! Template placeholder extraction
//!
//! A placeholder is `{{identifier}}` where identifier is one or more ASCII
//! word characters. Anything else (spaces inside the braces, `{{}}`,
//! unbalanced braces) is plain text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("invalid placeholder regex")
});

/// Extract unique placeholder names in first-seen order.
///
/// Names are case sensitive: `{{Name}}` and `{{name}}` are distinct.
///
/// # Example
/// ```
/// use campaignctl_core::extract_variables;
///
/// let vars = extract_variables("Hi {{name}}, order {{orderNumber}} for {{name}}");
/// assert_eq!(vars, vec!["name", "orderNumber"]);
/// ```
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_order() {
        let vars =
            extract_variables("Hi {{name}}, order {{orderNumber}} ships {{deliveryDate}}");
        assert_eq!(vars, vec!["name", "orderNumber", "deliveryDate"]);
    }

    #[test]
    fn no_placeholders() {
        assert!(extract_variables("Hello there, nothing to fill in").is_empty());
        assert!(extract_variables("").is_empty());
    }

    #[test]
    fn deduplicates_keeping_first() {
        let vars = extract_variables("{{b}} {{a}} {{b}} {{a}} {{c}}");
        assert_eq!(vars, vec!["b", "a", "c"]);
    }

    #[test]
    fn case_sensitive() {
        let vars = extract_variables("{{Name}} and {{name}}");
        assert_eq!(vars, vec!["Name", "name"]);
    }

    #[test]
    fn ignores_malformed() {
        assert!(extract_variables("{{name}").is_empty());
        assert!(extract_variables("{name}}").is_empty());
        assert!(extract_variables("{{ name }}").is_empty());
        assert!(extract_variables("{{}}").is_empty());
        assert!(extract_variables("{{first-name}}").is_empty());
    }

    #[test]
    fn nested_braces_match_inner() {
        assert_eq!(extract_variables("{{{code}}}"), vec!["code"]);
    }

    #[test]
    fn underscores_and_digits() {
        assert_eq!(
            extract_variables("{{order_id}} {{line2}} {{_x}}"),
            vec!["order_id", "line2", "_x"]
        );
    }
}
