//! Per-document key material and its secret-store lifecycle.

use crate::error::{CryptoError, CryptoResult};
use crate::keystore::SecretStore;
use crate::random::RandomSource;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use docwallet_types::DocumentId;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Service id prefix for per-document encryption keys.
pub const KEY_SERVICE_PREFIX: &str = "docwallet.key.";

/// Service id prefix for inline text content.
pub const CONTENT_SERVICE_PREFIX: &str = "docwallet.content.";

pub fn key_service_id(document_id: &DocumentId) -> String {
    format!("{KEY_SERVICE_PREFIX}{document_id}")
}

pub fn content_service_id(document_id: &DocumentId) -> String {
    format!("{CONTENT_SERVICE_PREFIX}{document_id}")
}

/// A 256-bit document key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DocumentKey([u8; KEY_SIZE]);

impl DocumentKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Base64 form held in the secret store.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let mut bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CryptoError::InvalidKeyEncoding)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DocumentKey(<redacted>)")
    }
}

/// Draws a fresh random key.
pub fn generate_key(random: &dyn RandomSource) -> CryptoResult<DocumentKey> {
    let mut bytes = [0u8; KEY_SIZE];
    random.fill_bytes(&mut bytes)?;
    let key = DocumentKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Creates, loads and deletes document keys in the secret store.
#[derive(Clone)]
pub struct KeyManager {
    store: Arc<dyn SecretStore>,
    random: Arc<dyn RandomSource>,
}

impl KeyManager {
    pub fn new(store: Arc<dyn SecretStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    pub fn service_id(&self, document_id: &DocumentId) -> String {
        key_service_id(document_id)
    }

    /// Loads the key for a document, or `None` if none was ever stored.
    pub async fn get_key(&self, document_id: &DocumentId) -> CryptoResult<Option<DocumentKey>> {
        match self.store.get(&key_service_id(document_id)).await? {
            Some(encoded) => DocumentKey::from_base64(&encoded).map(Some),
            None => Ok(None),
        }
    }

    /// Loads the existing key or generates and stores a new one.
    ///
    /// Callers must not race two first-time encryptions of the same document.
    pub async fn get_or_create_key(&self, document_id: &DocumentId) -> CryptoResult<DocumentKey> {
        if let Some(key) = self.get_key(document_id).await? {
            return Ok(key);
        }

        let key = generate_key(self.random.as_ref())?;
        self.store
            .set(&key_service_id(document_id), &key.to_base64())
            .await?;
        debug!("created encryption key for document {document_id}");
        Ok(key)
    }

    pub async fn delete_key(&self, document_id: &DocumentId) -> CryptoResult<()> {
        self.store.delete(&key_service_id(document_id)).await?;
        debug!("deleted encryption key for document {document_id}");
        Ok(())
    }
}
