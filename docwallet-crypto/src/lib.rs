//! Encryption layer for DocWallet.
//!
//! Provides per-document encryption using:
//! - AES-256-CBC with PKCS7 padding for file payloads
//! - A self-describing text envelope (`DWENC2:<iv>:<ciphertext>`)
//! - One random 256-bit key per document, held in a platform secret store
//!
//! # Architecture
//!
//! Document content has two confidentiality paths:
//!
//! 1. **File-backed**: bytes are encrypted with the document key and written
//!    as an envelope. A fresh IV is drawn for every encryption.
//!
//! 2. **Inline secret**: short text content is handed to the secret store as
//!    an opaque value. It is never AES-enveloped.
//!
//! [`StoredContent`](docwallet_types::StoredContent) tells the two apart so
//! callers cannot run one decryption path against the other's data.
//!
//! Keys are never rotated. A key is created on first encryption and deleted
//! together with the document's encrypted file.

mod cipher;
mod document;
pub mod envelope;
mod error;
mod key;
pub mod keystore;
mod random;

pub use cipher::{decrypt, encrypt, EncryptedPayload, IV_SIZE};
pub use document::{file_backed_path, DocumentCipher};
pub use envelope::{build_envelope, parse_envelope, ENVELOPE_TAG};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    content_service_id, generate_key, key_service_id, DocumentKey, KeyManager,
    CONTENT_SERVICE_PREFIX, KEY_SERVICE_PREFIX, KEY_SIZE,
};
pub use keystore::{MemorySecretStore, SecretStore};
pub use random::{OsRandom, RandomSource};
