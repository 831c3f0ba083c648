//! Document-level encryption over the two confidentiality paths.

use crate::cipher::{decrypt, encrypt};
use crate::envelope::parse_envelope;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{content_service_id, KeyManager};
use crate::keystore::SecretStore;
use crate::random::RandomSource;
use docwallet_types::{DocumentId, StoredContent};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Encrypts document payloads with per-document keys and manages inline secrets.
#[derive(Clone)]
pub struct DocumentCipher {
    keys: KeyManager,
    store: Arc<dyn SecretStore>,
    random: Arc<dyn RandomSource>,
}

impl DocumentCipher {
    pub fn new(store: Arc<dyn SecretStore>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            keys: KeyManager::new(store.clone(), random.clone()),
            store,
            random,
        }
    }

    pub fn keys(&self) -> &KeyManager {
        &self.keys
    }

    // ── File-backed payloads ────────────────────────────────────────

    /// Encrypts bytes for a document and returns the envelope text.
    ///
    /// The document key is created on first use and reused afterwards.
    pub async fn encrypt_payload(
        &self,
        document_id: &DocumentId,
        plaintext: &[u8],
    ) -> CryptoResult<String> {
        let key = self.keys.get_or_create_key(document_id).await?;
        let payload = encrypt(&key, plaintext, self.random.as_ref())?;
        Ok(payload.to_envelope())
    }

    /// Parses an envelope and decrypts it with the document's key.
    ///
    /// The envelope shape is checked before the key is looked up.
    pub async fn decrypt_payload(
        &self,
        document_id: &DocumentId,
        envelope: &str,
    ) -> CryptoResult<Vec<u8>> {
        let payload = parse_envelope(envelope)?;
        let key = self
            .keys
            .get_key(document_id)
            .await?
            .ok_or_else(|| CryptoError::MissingKey(document_id.to_string()))?;
        decrypt(&key, &payload.iv, &payload.ciphertext)
    }

    // ── Inline secrets ──────────────────────────────────────────────

    /// Moves short text content into the secret store.
    ///
    /// This is not AES-enveloped: confidentiality comes from the store itself.
    pub async fn store_inline_content(
        &self,
        document_id: &DocumentId,
        text: &str,
    ) -> CryptoResult<StoredContent> {
        let service_id = content_service_id(document_id);
        self.store.set(&service_id, text).await?;
        debug!("stored inline content for document {document_id}");
        Ok(StoredContent::InlineSecret(service_id))
    }

    pub async fn read_inline_content(&self, content: &StoredContent) -> CryptoResult<Option<String>> {
        let service_id = inline_service_id(content)?;
        self.store.get(service_id).await
    }

    pub async fn delete_inline_content(&self, content: &StoredContent) -> CryptoResult<()> {
        let service_id = inline_service_id(content)?;
        self.store.delete(service_id).await
    }
}

/// Path of file-backed content. Inline secrets are never AES-enveloped files.
pub fn file_backed_path(content: &StoredContent) -> CryptoResult<&Path> {
    content.file_path().ok_or(CryptoError::WrongContentKind {
        expected: "file-backed",
        actual: "inline secret",
    })
}

fn inline_service_id(content: &StoredContent) -> CryptoResult<&str> {
    content.service_id().ok_or(CryptoError::WrongContentKind {
        expected: "inline secret",
        actual: "file-backed",
    })
}
