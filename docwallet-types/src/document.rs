use crate::content::ContentRef;
use crate::doc_type::DocumentType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, immutable document identity.
///
/// Ids end up in filenames and credential-store service ids, so path
/// separators, `..` and empty strings are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document id: {0:?}")]
pub struct InvalidDocumentId(pub String);

impl DocumentId {
    pub fn parse(id: impl Into<String>) -> Result<Self, InvalidDocumentId> {
        let id = id.into();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(InvalidDocumentId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidDocumentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// The subset of a document record this layer reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    /// `<id>_<sanitized basename>`; required for lookup once stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
    /// Literal path/URI, or `encrypted:<id>`.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn content_ref(&self) -> ContentRef<'_> {
        ContentRef::parse(&self.content)
    }

    pub fn is_encrypted(&self) -> bool {
        self.content_ref().is_encrypted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_hostile_ids() {
        assert!(DocumentId::parse("").is_err());
        assert!(DocumentId::parse("..").is_err());
        assert!(DocumentId::parse("a/b").is_err());
        assert!(DocumentId::parse("a\\b").is_err());
        assert_eq!(DocumentId::parse("doc123").unwrap().as_str(), "doc123");
    }

    #[test]
    fn document_serializes_camel_case() {
        let doc = Document {
            id: DocumentId::parse("doc123").unwrap(),
            title: "Passport".into(),
            stored_filename: Some("doc123_doc.pdf".into()),
            content: "encrypted:doc123".into(),
            source_uri: None,
            metadata: DocumentMetadata {
                doc_type: DocumentType::Pdf,
                mime_type: Some("application/pdf".into()),
                size: Some(12_345),
            },
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["storedFilename"], "doc123_doc.pdf");
        assert_eq!(json["metadata"]["type"], "pdf");
        assert!(json.get("sourceUri").is_none());

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
        assert!(back.is_encrypted());
    }

    #[test]
    fn invalid_id_fails_deserialization() {
        let json = serde_json::json!({ "id": "../etc", "content": "x" });
        assert!(serde_json::from_value::<Document>(json).is_err());
    }
}
