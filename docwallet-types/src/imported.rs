use crate::doc_type::DocumentType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A picked file that has been resolved to a locally readable copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedDocument {
    /// URI the picker returned, kept for reference only.
    pub original_uri: String,
    /// Local copy to read from.
    pub local_uri: PathBuf,
    pub name: String,
    pub size: u64,
    pub doc_type: DocumentType,
    pub mime_type: String,
}
