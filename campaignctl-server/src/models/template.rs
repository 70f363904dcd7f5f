//! Template payloads

use serde::Deserialize;

use campaignctl_core::validation::{require_max_len, require_non_blank, require_present};
use campaignctl_core::{extract_variables, MediaType, TemplateCategory};

use super::{filter_value, ValidationError, MAX_NAME_LEN, MAX_URL_LEN};

/// Longest accepted template body
const MAX_CONTENT_LEN: usize = 4096;

/// Template create/update payload.
///
/// Any `variables` sent by the client are ignored; they are always
/// recomputed from `content`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: Option<String>,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub category: Option<String>,
}

/// Validated template fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFields {
    pub name: String,
    pub content: String,
    pub media_url: String,
    pub media_type: MediaType,
    pub variables: Vec<String>,
    pub category: TemplateCategory,
}

impl TemplateInput {
    pub fn into_fields(self) -> Result<TemplateFields, ValidationError> {
        build(
            self.name.unwrap_or_default(),
            self.content.unwrap_or_default(),
            self.media_url.unwrap_or_default(),
            self.media_type.as_deref(),
            self.category.as_deref(),
        )
    }

    /// Apply the supplied fields over `current`; variables follow the merged content.
    pub fn merge(self, current: TemplateFields) -> Result<TemplateFields, ValidationError> {
        let media_type = self
            .media_type
            .unwrap_or_else(|| current.media_type.as_str().to_owned());
        let category = self
            .category
            .unwrap_or_else(|| current.category.as_str().to_owned());

        build(
            self.name.unwrap_or(current.name),
            self.content.unwrap_or(current.content),
            self.media_url.unwrap_or(current.media_url),
            Some(&media_type),
            Some(&category),
        )
    }
}

fn build(
    name: String,
    content: String,
    media_url: String,
    media_type: Option<&str>,
    category: Option<&str>,
) -> Result<TemplateFields, ValidationError> {
    let name = require_non_blank("name", &name)?;
    require_max_len("name", &name, MAX_NAME_LEN)?;
    let content = require_present("content", &content)?;
    require_max_len("content", &content, MAX_CONTENT_LEN)?;

    let media_url = media_url.trim().to_owned();
    require_max_len("mediaUrl", &media_url, MAX_URL_LEN)?;

    let media_type = match media_type {
        Some(t) => t.parse()?,
        None => MediaType::default(),
    };
    let category = match category {
        Some(c) => c.parse()?,
        None => TemplateCategory::default(),
    };

    Ok(TemplateFields {
        variables: extract_variables(&content),
        name,
        content,
        media_url,
        media_type,
        category,
    })
}

/// `GET /templates` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl TemplateFilter {
    pub fn search(&self) -> Option<&str> {
        filter_value(self.search.as_deref())
    }

    pub fn category(&self) -> Result<Option<TemplateCategory>, ValidationError> {
        filter_value(self.category.as_deref())
            .map(str::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(content: &str) -> TemplateInput {
        TemplateInput {
            name: Some("Order shipped".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    #[test]
    fn variables_follow_content() {
        let fields = input("Hi {{name}}, order {{orderNumber}} ships {{deliveryDate}}")
            .into_fields()
            .unwrap();
        assert_eq!(fields.variables, vec!["name", "orderNumber", "deliveryDate"]);
        assert_eq!(fields.category, TemplateCategory::Marketing);
    }

    #[test]
    fn content_formatting_is_preserved() {
        let body = "  Hi {{name}}\n\nSee you soon  \n";
        let fields = input(body).into_fields().unwrap();
        assert_eq!(fields.content, body);
        assert_eq!(fields.variables, vec!["name"]);

        assert_eq!(
            input(" \n\t").into_fields().unwrap_err(),
            ValidationError::Empty { field: "content" }
        );
    }

    #[test]
    fn merge_replaces_variables() {
        let current = input("Hi {{name}} {{code}}").into_fields().unwrap();
        let patch = TemplateInput {
            content: Some("Your code is {{code}}".into()),
            ..Default::default()
        };
        let merged = patch.merge(current).unwrap();
        assert_eq!(merged.variables, vec!["code"]);
        assert_eq!(merged.name, "Order shipped");
    }

    #[test]
    fn merge_without_content_keeps_variables() {
        let current = input("Hi {{name}}").into_fields().unwrap();
        let patch = TemplateInput {
            category: Some("utility".into()),
            ..Default::default()
        };
        let merged = patch.merge(current).unwrap();
        assert_eq!(merged.variables, vec!["name"]);
        assert_eq!(merged.category, TemplateCategory::Utility);
    }

    #[test]
    fn client_variables_are_ignored() {
        let parsed: TemplateInput = serde_json::from_str(
            r#"{"name":"x","content":"plain text","variables":["injected"]}"#,
        )
        .unwrap();
        assert!(parsed.into_fields().unwrap().variables.is_empty());
    }

    #[test]
    fn rejects_bad_category() {
        let mut req = input("hello");
        req.category = Some("promo".into());
        assert!(matches!(
            req.into_fields(),
            Err(ValidationError::InvalidVariant {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn filter_all_category_is_none() {
        let filter = TemplateFilter {
            search: None,
            category: Some("all".into()),
        };
        assert_eq!(filter.category().unwrap(), None);
    }
}
