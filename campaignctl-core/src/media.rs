//! Media attachments: type classification and stored file naming

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Longest file extension kept when naming stored uploads
const MAX_EXTENSION_LEN: usize = 10;

/// Kind of media attached to a campaign or template.
///
/// `None` serialises as the empty string, the "no attachment" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    #[serde(rename = "")]
    None,
    Image,
    Video,
    Document,
}

impl MediaType {
    pub const ALL: [Self; 4] = [Self::None, Self::Image, Self::Video, Self::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
        }
    }
}

impl FromStr for MediaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "mediaType",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification by MIME prefix. Unknown or missing types are documents.
pub fn classify_mime(mime: Option<&str>) -> MediaType {
    let mime = mime.unwrap_or_default().trim().to_ascii_lowercase();
    if mime.starts_with("image/") {
        MediaType::Image
    } else if mime.starts_with("video/") {
        MediaType::Video
    } else {
        MediaType::Document
    }
}

/// Lowercased extension of an uploaded file name, if it has a sane one.
pub fn file_extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Stored name for an upload: `<stem>.<ext>` or just `<stem>` without a usable extension.
pub fn stored_file_name(stem: &str, original_name: &str) -> String {
    match file_extension(original_name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify_mime(Some("image/png")), MediaType::Image);
        assert_eq!(classify_mime(Some("IMAGE/JPEG")), MediaType::Image);
        assert_eq!(classify_mime(Some("video/mp4")), MediaType::Video);
        assert_eq!(classify_mime(Some("application/pdf")), MediaType::Document);
        assert_eq!(classify_mime(Some("text/csv")), MediaType::Document);
        assert_eq!(classify_mime(None), MediaType::Document);
    }

    #[test]
    fn none_serializes_empty() {
        assert_eq!(serde_json::to_string(&MediaType::None).unwrap(), "\"\"");
        assert_eq!(
            serde_json::from_str::<MediaType>("\"video\"").unwrap(),
            MediaType::Video
        );
        assert_eq!("".parse::<MediaType>().unwrap(), MediaType::None);
    }

    #[test]
    fn extension_handling() {
        assert_eq!(file_extension("Promo.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("weird.ex t"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn stored_names() {
        assert_eq!(stored_file_name("abc", "photo.png"), "abc.png");
        assert_eq!(stored_file_name("abc", "noext"), "abc");
        assert_eq!(stored_file_name("abc", "../../etc/passwd"), "abc");
    }
}
