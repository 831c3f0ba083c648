use serde::{Deserialize, Serialize};

/// Closed set of document kinds used to pick MIME and viewer hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Text,
    #[default]
    Unknown,
}

/// MIME → type table. Anything not listed maps to [`DocumentType::Unknown`].
const MIME_TABLE: &[(&str, DocumentType)] = &[
    ("application/pdf", DocumentType::Pdf),
    ("image/jpeg", DocumentType::Jpeg),
    ("image/jpg", DocumentType::Jpeg),
    ("image/png", DocumentType::Png),
    ("text/plain", DocumentType::Text),
];

impl DocumentType {
    /// Infers the type from a MIME string (case-insensitive, parameters ignored).
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        MIME_TABLE
            .iter()
            .find(|(m, _)| *m == essence)
            .map(|(_, t)| *t)
            .unwrap_or(DocumentType::Unknown)
    }

    /// Canonical MIME type for viewers.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Jpeg => "image/jpeg",
            DocumentType::Png => "image/png",
            DocumentType::Text => "text/plain",
            DocumentType::Unknown => "application/octet-stream",
        }
    }

    /// Preferred file extension, used when naming preview copies.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            DocumentType::Pdf => Some("pdf"),
            DocumentType::Jpeg => Some("jpg"),
            DocumentType::Png => Some("png"),
            DocumentType::Text => Some("txt"),
            DocumentType::Unknown => None,
        }
    }
}
