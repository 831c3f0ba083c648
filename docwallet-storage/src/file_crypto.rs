//! Envelope encryption of files on disk.

use crate::error::{StorageError, StorageResult};
use crate::fs_util::{remove_file_if_exists, write_atomic};
use docwallet_crypto::{file_backed_path, CryptoError, DocumentCipher};
use docwallet_types::{DocumentId, StoredContent};
use std::path::Path;
use tracing::{debug, warn};

/// Encrypts and decrypts document files with their per-document keys.
#[derive(Clone)]
pub struct FileEncryption {
    cipher: DocumentCipher,
}

impl FileEncryption {
    pub fn new(cipher: DocumentCipher) -> Self {
        Self { cipher }
    }

    pub fn cipher(&self) -> &DocumentCipher {
        &self.cipher
    }

    /// Replaces the file at `path` with its `DWENC2` envelope.
    ///
    /// The envelope is written to a sibling temp file and renamed over
    /// `path`, so the file is either fully plaintext or fully enveloped.
    /// A key created by a failed call is deleted again.
    pub async fn encrypt_file_in_place(
        &self,
        path: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        let encryption_failed = |reason: String| StorageError::EncryptionFailed {
            path: path.to_path_buf(),
            reason,
        };

        let had_key = self
            .cipher
            .keys()
            .get_key(document_id)
            .await
            .map_err(|e| encryption_failed(e.to_string()))?
            .is_some();

        let result = self.write_envelope(path, document_id).await;
        if result.is_err() && !had_key {
            if let Err(e) = self.cipher.keys().delete_key(document_id).await {
                warn!("failed to remove unused key for document {document_id}: {e}");
            }
        }
        result.map_err(encryption_failed)?;

        debug!("encrypted {} in place", path.display());
        Ok(())
    }

    async fn write_envelope(&self, path: &Path, document_id: &DocumentId) -> Result<(), String> {
        let plaintext = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
        let envelope = self
            .cipher
            .encrypt_payload(document_id, &plaintext)
            .await
            .map_err(|e| e.to_string())?;
        write_atomic(path, envelope.as_bytes())
            .await
            .map_err(|e| e.to_string())
    }

    /// Decrypts the envelope at `encrypted` into `destination`.
    ///
    /// Nothing is written to `destination` unless decryption succeeds.
    pub async fn decrypt_file(
        &self,
        encrypted: &Path,
        destination: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        let raw = tokio::fs::read(encrypted).await?;
        let text = String::from_utf8(raw).map_err(|_| CryptoError::InvalidEnvelope)?;
        let plaintext = self
            .cipher
            .decrypt_payload(document_id, text.trim_end())
            .await?;

        write_atomic(destination, &plaintext).await?;
        debug!(
            "decrypted {} to {}",
            encrypted.display(),
            destination.display()
        );
        Ok(())
    }

    /// Decrypts file-backed content into `destination`.
    ///
    /// Inline secrets are rejected with `WrongContentKind`; they are read
    /// through the secret store, not from disk.
    pub async fn decrypt_content(
        &self,
        content: &StoredContent,
        destination: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        let encrypted = file_backed_path(content)?;
        self.decrypt_file(encrypted, destination, document_id).await
    }

    /// Like [`decrypt_file`](Self::decrypt_file), but reports failure as `false`.
    ///
    /// Any stale file at `destination` is removed on failure.
    pub async fn decrypt_file_for_preview(
        &self,
        encrypted: &Path,
        destination: &Path,
        document_id: &DocumentId,
    ) -> bool {
        match self.decrypt_file(encrypted, destination, document_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("preview decryption failed for {}: {e}", encrypted.display());
                if let Err(cleanup) = remove_file_if_exists(destination).await {
                    warn!(
                        "failed to remove preview {}: {cleanup}",
                        destination.display()
                    );
                }
                false
            }
        }
    }
}
