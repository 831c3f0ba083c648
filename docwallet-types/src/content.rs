use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the content sentinel marking bytes held behind the encryption layer.
pub const ENCRYPTED_CONTENT_PREFIX: &str = "encrypted:";

/// Borrowed view of a document's `content` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRef<'a> {
    /// `encrypted:<id>`: content lives behind the key for `<id>`.
    Encrypted(&'a str),
    /// A literal path or URI.
    Plain(&'a str),
}

impl<'a> ContentRef<'a> {
    pub fn parse(content: &'a str) -> Self {
        match content.strip_prefix(ENCRYPTED_CONTENT_PREFIX) {
            Some(id) => ContentRef::Encrypted(id),
            None => ContentRef::Plain(content),
        }
    }

    /// Builds the `encrypted:<id>` sentinel.
    pub fn encrypted_sentinel(document_id: &str) -> String {
        format!("{ENCRYPTED_CONTENT_PREFIX}{document_id}")
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, ContentRef::Encrypted(_))
    }
}

/// Where a document's confidential content actually lives.
///
/// File content is AES-enveloped on disk; inline text is handed to the
/// credential store as an opaque secret. The two are decrypted by different
/// code paths and must not be confused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredContent {
    FileBacked(PathBuf),
    InlineSecret(String),
}

impl StoredContent {
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            StoredContent::FileBacked(path) => Some(path),
            StoredContent::InlineSecret(_) => None,
        }
    }

    pub fn service_id(&self) -> Option<&str> {
        match self {
            StoredContent::FileBacked(_) => None,
            StoredContent::InlineSecret(id) => Some(id),
        }
    }
}
