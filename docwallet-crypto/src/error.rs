//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in encryption, decryption and key handling.
///
/// Decryption failures are opaque: a wrong key, a corrupted
/// ciphertext and a bad padding block all surface as [`CryptoError::Decryption`].
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid encrypted envelope")]
    InvalidEnvelope,

    #[error("decryption failed (wrong key or corrupted data)")]
    Decryption,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("stored key is not valid base64")]
    InvalidKeyEncoding,

    #[error("random source failure: {0}")]
    Random(String),

    #[error("no key stored for document {0}")]
    MissingKey(String),

    #[error("secret store error: {0}")]
    SecretStore(String),

    #[error("expected {expected} content, got {actual}")]
    WrongContentKind {
        expected: &'static str,
        actual: &'static str,
    },
}
