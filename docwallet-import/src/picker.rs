//! Boundary to the platform file-picking surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A type a virtual file can be exported to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertibleType {
    pub mime_type: String,
    pub extension: String,
}

/// One picker result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedFile {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub convertible_to_mime_types: Vec<ConvertibleType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    /// MIME filters, e.g. `application/pdf` or `image/*`.
    pub mime_types: Vec<String>,
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user dismissed the picker.
    Cancelled,
    Picked(Vec<PickedFile>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDestination {
    CachesDirectory,
    DocumentDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCopyRequest {
    pub uri: String,
    pub file_name: String,
    /// Export a virtual file to this MIME type instead of copying bytes.
    pub convert_virtual_file_to_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCopyResult {
    Success {
        source_uri: String,
        local_uri: PathBuf,
    },
    Error {
        source_uri: String,
        copy_error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHandle {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    Failed(String),
}

/// Platform file picker.
#[async_trait]
pub trait DocumentPicker: Send + Sync {
    async fn pick(&self, request: &PickRequest) -> Result<PickOutcome, PickerError>;

    /// Returns `None` if the user cancelled.
    async fn pick_directory(
        &self,
        request_long_term_access: bool,
    ) -> Result<Option<DirectoryHandle>, PickerError>;

    /// Produces local copies of picked files, one result per request, in order.
    async fn keep_local_copy(
        &self,
        files: &[LocalCopyRequest],
        destination: CopyDestination,
    ) -> Result<Vec<LocalCopyResult>, PickerError>;
}
