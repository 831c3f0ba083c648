//! Storage error types.

use docwallet_crypto::CryptoError;
use docwallet_import::ImportError;
use docwallet_types::InvalidDocumentId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    // Preconditions
    #[error("source file is missing or empty: {0}")]
    SourceInaccessible(PathBuf),

    #[error("document {0} has no stored filename")]
    MissingStoredFilename(String),

    // Integrity
    #[error("copy verification failed for {path}: {reason}")]
    CopyVerificationFailed { path: PathBuf, reason: String },

    #[error("saved file failed verification: {0}")]
    SaveVerificationFailed(PathBuf),

    #[error("document {0} is in an inconsistent state")]
    InconsistentDocumentState(String),

    // Crypto
    #[error("encryption failed for {path}: {reason}")]
    EncryptionFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to create preview file: {0}")]
    PreviewCreationFailed(#[source] std::io::Error),

    #[error("storage health check failed: {0}")]
    HealthCheck(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    InvalidDocumentId(#[from] InvalidDocumentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
