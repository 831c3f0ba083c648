//! Import error types.

use crate::picker::PickerError;
use thiserror::Error;

/// Shown to the user when the picker rejects the chosen file's type.
pub const UNSUPPORTED_FILE_TYPE_MESSAGE: &str =
    "This file type is not supported. Please choose a PDF, image or text file.";

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{message}")]
    UnsupportedFileType {
        message: String,
        #[source]
        source: PickerError,
    },

    #[error("file picker failed: {0}")]
    Picker(#[source] PickerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Translates picker failures, giving unsupported-type errors a user-facing message.
    pub fn from_picker(err: PickerError) -> Self {
        match err {
            PickerError::UnsupportedFileType(_) => ImportError::UnsupportedFileType {
                message: UNSUPPORTED_FILE_TYPE_MESSAGE.to_string(),
                source: err,
            },
            other => ImportError::Picker(other),
        }
    }
}
