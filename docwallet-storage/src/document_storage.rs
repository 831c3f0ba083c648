//! Save, locate, delete and view documents across the storage layout.

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::file_crypto::FileEncryption;
use crate::fs_util::{is_file, non_empty_size, remove_file_if_exists};
use crate::layout::{is_plain_filename, stored_filename_for, LocatedFile, LocationKind, StorageLayout};
use crate::preview::{CleanupReport, PreviewManager};
use crate::reporter::{ErrorReporter, TracingReporter};
use docwallet_crypto::{DocumentCipher, OsRandom, RandomSource, SecretStore};
use docwallet_import::{DocumentImporter, ImportOptions};
use docwallet_types::{
    ContentRef, Document, DocumentId, DocumentMetadata, ImportedDocument, StoredContent,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

const FALLBACK_BASENAME: &str = "document";
const HEALTH_CHECK_DATA: &[u8] = b"docwallet_health_check";

/// Result of a successful [`DocumentStorage::save_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub uri: PathBuf,
    pub exists: bool,
    pub size: u64,
    pub final_filename: String,
    pub encrypted: bool,
}

impl SavedFile {
    pub fn stored_content(&self) -> StoredContent {
        StoredContent::FileBacked(self.uri.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub location: LocationKind,
}

/// Storage context for one data root.
///
/// Construct once at startup and share by clone; clones share the
/// initialization state.
#[derive(Clone)]
pub struct DocumentStorage {
    layout: StorageLayout,
    files: FileEncryption,
    previews: PreviewManager,
    reporter: Arc<dyn ErrorReporter>,
    initialized: Arc<OnceCell<()>>,
}

impl DocumentStorage {
    pub fn new(config: &StorageConfig, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_parts(config, secrets, Arc::new(OsRandom), Arc::new(TracingReporter))
    }

    pub fn with_parts(
        config: &StorageConfig,
        secrets: Arc<dyn SecretStore>,
        random: Arc<dyn RandomSource>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let layout = StorageLayout::new(config);
        Self {
            files: FileEncryption::new(DocumentCipher::new(secrets, random)),
            previews: PreviewManager::new(layout.cache_dir(), reporter.clone()),
            layout,
            reporter,
            initialized: Arc::new(OnceCell::new()),
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn cipher(&self) -> &DocumentCipher {
        self.files.cipher()
    }

    pub fn previews(&self) -> &PreviewManager {
        &self.previews
    }

    /// Creates the storage directories once. Every entry point awaits this.
    pub async fn initialize(&self) -> StorageResult<()> {
        let layout = &self.layout;
        self.initialized
            .get_or_try_init(|| async move {
                for dir in layout.required_dirs() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                debug!("storage initialized at {}", layout.root().display());
                Ok::<(), StorageError>(())
            })
            .await?;
        Ok(())
    }

    // ── Save ────────────────────────────────────────────────────────

    /// Moves `source` into durable storage under `<id>_<sanitized name>`.
    ///
    /// Sources from the cache, and anything to be encrypted, are first copied
    /// into the documents directory. Cache sources are removed after that
    /// copy. Encrypted saves end up in the encrypted directory and the
    /// intermediate copy is removed.
    ///
    /// A source that already is `documents/<id>_<name>` is used as the
    /// intermediate copy itself, so an encrypted save moves it into the
    /// encrypted directory.
    ///
    /// Any cached preview of an earlier version of the file is purged.
    pub async fn save_file(
        &self,
        source: &Path,
        document_id: &DocumentId,
        should_encrypt: bool,
        filename: Option<&str>,
    ) -> StorageResult<SavedFile> {
        self.initialize().await?;

        if non_empty_size(source).await.is_none() {
            return Err(StorageError::SourceInaccessible(source.to_path_buf()));
        }

        let basename = filename
            .map(str::to_owned)
            .or_else(|| {
                source
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_BASENAME.to_string());
        let final_filename = stored_filename_for(document_id, &basename);

        let from_cache = self.layout.is_in_cache(source);
        let working = if from_cache || should_encrypt {
            let intermediate = self.layout.documents_dir().join(&final_filename);
            if intermediate != source {
                copy_verified(source, &intermediate).await?;
            }
            if from_cache {
                if let Err(e) = remove_file_if_exists(source).await {
                    warn!("failed to remove cached source {}: {e}", source.display());
                }
            }
            intermediate
        } else {
            source.to_path_buf()
        };

        let final_path = if should_encrypt {
            let target = self.layout.encrypted_dir().join(&final_filename);
            // A cache source is already gone, so the intermediate copy is the
            // only one left if encryption fails.
            let discard_working = !from_cache && working != source;
            self.encrypt_into(&working, &target, document_id, discard_working)
                .await?;
            if let Err(e) = remove_file_if_exists(&working).await {
                warn!(
                    "failed to remove intermediate copy {}: {e}",
                    working.display()
                );
            }
            target
        } else {
            working
        };

        let Some(size) = non_empty_size(&final_path).await else {
            if final_path != source {
                let _ = remove_file_if_exists(&final_path).await;
            }
            return Err(StorageError::SaveVerificationFailed(final_path));
        };

        let stale_preview = self.layout.preview_cache_path(&final_filename);
        if let Err(e) = remove_file_if_exists(&stale_preview).await {
            self.reporter.report("failed to purge stale preview", &e);
        }

        info!(
            "saved document {document_id} to {} ({size} bytes, encrypted: {should_encrypt})",
            final_path.display()
        );
        Ok(SavedFile {
            uri: final_path,
            exists: true,
            size,
            final_filename,
            encrypted: should_encrypt,
        })
    }

    /// Copies `working` to `target` and encrypts it there.
    ///
    /// On failure `target` is removed. `working` is removed too when
    /// `discard_working` is set; otherwise it stays as the surviving copy.
    async fn encrypt_into(
        &self,
        working: &Path,
        target: &Path,
        document_id: &DocumentId,
        discard_working: bool,
    ) -> StorageResult<()> {
        let result = match copy_verified(working, target).await {
            Ok(()) => self
                .files
                .encrypt_file_in_place(target, document_id)
                .await
                .map_err(|e| match e {
                    e @ StorageError::EncryptionFailed { .. } => e,
                    other => StorageError::EncryptionFailed {
                        path: target.to_path_buf(),
                        reason: other.to_string(),
                    },
                }),
            Err(e) => Err(e),
        };

        if result.is_err() {
            let _ = remove_file_if_exists(target).await;
            if discard_working {
                let _ = remove_file_if_exists(working).await;
            } else {
                warn!(
                    "encryption failed; keeping unencrypted copy at {}",
                    working.display()
                );
            }
        }
        result
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Finds a stored file, probing the storage locations in priority order.
    ///
    /// Copies at lower-priority locations are returned as `shadowed` and
    /// logged as a consistency warning.
    pub async fn locate(&self, stored_filename: &str) -> StorageResult<Option<LocatedFile>> {
        self.initialize().await?;

        if !is_plain_filename(stored_filename) {
            warn!("rejecting stored filename {stored_filename:?}");
            return Ok(None);
        }

        let mut found = Vec::new();
        for location in self.layout.locations() {
            let candidate = location.dir.join(stored_filename);
            if is_file(&candidate).await {
                found.push((location.kind, candidate));
            }
        }

        let mut found = found.into_iter();
        let Some((kind, path)) = found.next() else {
            return Ok(None);
        };
        let shadowed: Vec<PathBuf> = found.map(|(_, path)| path).collect();
        if !shadowed.is_empty() {
            warn!(
                "{stored_filename} exists in {} locations; using {}",
                shadowed.len() + 1,
                path.display()
            );
        }

        Ok(Some(LocatedFile {
            kind,
            path,
            shadowed,
        }))
    }

    pub async fn get_file(&self, stored_filename: &str) -> StorageResult<Option<FileInfo>> {
        let Some(located) = self.locate(stored_filename).await? else {
            return Ok(None);
        };
        let size = tokio::fs::metadata(&located.path).await?.len();
        Ok(Some(FileInfo {
            path: located.path,
            size,
            location: located.kind,
        }))
    }

    // ── Delete ──────────────────────────────────────────────────────

    /// Deletes the highest-priority copy of a stored file.
    ///
    /// The document key is deleted only when the copy was in the encrypted
    /// directory. A cached decrypted preview is purged as well. Returns
    /// whether a file was found and removed.
    pub async fn delete_file(
        &self,
        document_id: &DocumentId,
        stored_filename: &str,
    ) -> StorageResult<bool> {
        let Some(located) = self.locate(stored_filename).await? else {
            debug!("nothing to delete for {stored_filename}");
            return Ok(false);
        };

        let removed = remove_file_if_exists(&located.path).await?;

        if located.kind == LocationKind::Encrypted {
            if let Err(e) = self.cipher().keys().delete_key(document_id).await {
                self.reporter
                    .report(&format!("failed to delete key for document {document_id}"), &e);
            }
        }

        let preview = self.layout.preview_cache_path(stored_filename);
        if let Err(e) = remove_file_if_exists(&preview).await {
            self.reporter.report("failed to purge cached preview", &e);
        }

        info!("deleted {} for document {document_id}", located.path.display());
        Ok(removed)
    }

    // ── Viewing ─────────────────────────────────────────────────────

    /// Resolves a document to a readable local file.
    ///
    /// Encrypted documents are decrypted into `preview_<stored filename>` in
    /// the cache, which is reused while it exists. Unencrypted documents are
    /// returned where they are stored.
    pub async fn get_document_temp_uri(&self, document: &Document) -> StorageResult<PathBuf> {
        let stored_filename = document
            .stored_filename
            .as_deref()
            .ok_or_else(|| StorageError::MissingStoredFilename(document.id.to_string()))?;

        let located = self
            .locate(stored_filename)
            .await?
            .ok_or_else(|| StorageError::FileNotFound(stored_filename.to_string()))?;

        match (located.kind, document.content_ref()) {
            (LocationKind::Encrypted, ContentRef::Encrypted(key_id)) => {
                let key_id = DocumentId::parse(key_id)?;
                let preview = self.layout.preview_cache_path(stored_filename);
                if non_empty_size(&preview).await.is_some() {
                    debug!("reusing cached preview {}", preview.display());
                    return Ok(preview);
                }
                let content = StoredContent::FileBacked(located.path);
                self.files
                    .decrypt_content(&content, &preview, &key_id)
                    .await?;
                Ok(preview)
            }
            (LocationKind::Documents | LocationKind::LegacyRoot, _) => Ok(located.path),
            (LocationKind::Encrypted, ContentRef::Plain(_)) => match &document.source_uri {
                Some(source_uri) => Ok(PathBuf::from(source_uri)),
                None => Err(StorageError::InconsistentDocumentState(
                    document.id.to_string(),
                )),
            },
        }
    }

    pub async fn encrypt_file_in_place(
        &self,
        path: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        self.initialize().await?;
        self.files.encrypt_file_in_place(path, document_id).await
    }

    pub async fn decrypt_file(
        &self,
        encrypted: &Path,
        destination: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        self.initialize().await?;
        self.files
            .decrypt_file(encrypted, destination, document_id)
            .await
    }

    /// Decrypts file-backed content. Inline secrets give `WrongContentKind`.
    pub async fn decrypt_content(
        &self,
        content: &StoredContent,
        destination: &Path,
        document_id: &DocumentId,
    ) -> StorageResult<()> {
        self.initialize().await?;
        self.files
            .decrypt_content(content, destination, document_id)
            .await
    }

    pub async fn decrypt_file_for_preview(
        &self,
        encrypted: &Path,
        destination: &Path,
        document_id: &DocumentId,
    ) -> bool {
        if let Err(e) = self.initialize().await {
            warn!("storage initialization failed: {e}");
            return false;
        }
        self.files
            .decrypt_file_for_preview(encrypted, destination, document_id)
            .await
    }

    pub async fn create_temporary_preview_file(
        &self,
        source: &Path,
        preferred_extension: Option<&str>,
    ) -> StorageResult<PathBuf> {
        self.initialize().await?;
        self.previews
            .create_temporary_preview_file(source, preferred_extension)
            .await
    }

    pub async fn delete_preview_file(&self, preview: &Path) -> bool {
        self.previews.delete_preview_file(preview).await
    }

    pub async fn cleanup_preview_files(&self) -> CleanupReport {
        self.previews.cleanup_temporary_preview_files().await
    }

    // ── Import ──────────────────────────────────────────────────────

    /// Imports documents through the picker and stores each under a new id.
    ///
    /// All or nothing: if any file fails to save, the documents already
    /// stored by this call are deleted again (keys included), along with
    /// the failed file's leftovers and the remaining import copies.
    pub async fn import_and_store_document(
        &self,
        importer: &DocumentImporter,
        options: ImportOptions,
        should_encrypt: bool,
    ) -> StorageResult<Vec<Document>> {
        let imported = importer.import_document(options).await?;
        let mut documents = Vec::with_capacity(imported.len());
        let mut pending = imported.into_iter();
        while let Some(file) = pending.next() {
            let document_id = DocumentId::parse(Uuid::new_v4().to_string())?;
            let leftover = self
                .layout
                .documents_dir()
                .join(stored_filename_for(&document_id, &file.name));
            match self
                .store_imported_document(file, document_id, should_encrypt)
                .await
            {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!("import failed after {} stored documents: {e}", documents.len());
                    self.discard_import(&documents, &leftover, pending).await;
                    return Err(e);
                }
            }
        }
        Ok(documents)
    }

    /// Best-effort rollback of a partially stored import.
    async fn discard_import(
        &self,
        stored: &[Document],
        leftover: &Path,
        pending: impl Iterator<Item = ImportedDocument>,
    ) {
        for document in stored {
            let Some(stored_filename) = document.stored_filename.as_deref() else {
                continue;
            };
            if let Err(e) = self.delete_file(&document.id, stored_filename).await {
                self.reporter.report("failed to roll back stored document", &e);
            }
        }

        // The picked original still exists upstream.
        if let Err(e) = remove_file_if_exists(leftover).await {
            self.reporter.report("failed to remove partial import copy", &e);
        }

        for file in pending.filter(|file| self.layout.is_in_cache(&file.local_uri)) {
            if let Err(e) = remove_file_if_exists(&file.local_uri).await {
                self.reporter.report("failed to remove pending import copy", &e);
            }
        }
    }

    /// Saves one imported file and builds its document record.
    pub async fn store_imported_document(
        &self,
        file: ImportedDocument,
        document_id: DocumentId,
        should_encrypt: bool,
    ) -> StorageResult<Document> {
        let saved = self
            .save_file(&file.local_uri, &document_id, should_encrypt, Some(&file.name))
            .await?;

        let content = if saved.encrypted {
            ContentRef::encrypted_sentinel(document_id.as_str())
        } else {
            saved.uri.to_string_lossy().into_owned()
        };

        Ok(Document {
            id: document_id,
            title: file.name,
            stored_filename: Some(saved.final_filename),
            content,
            source_uri: Some(file.original_uri),
            metadata: DocumentMetadata {
                doc_type: file.doc_type,
                mime_type: Some(file.mime_type),
                size: Some(saved.size),
            },
        })
    }

    // ── Health ──────────────────────────────────────────────────────

    /// Writes, reads back and deletes a probe file in every storage directory.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.initialize().await?;

        for dir in self.layout.required_dirs() {
            let probe = dir.join(format!(".health_check_{}", Uuid::new_v4()));
            let check = async {
                tokio::fs::write(&probe, HEALTH_CHECK_DATA).await?;
                let read_back = tokio::fs::read(&probe).await?;
                tokio::fs::remove_file(&probe).await?;
                Ok::<bool, std::io::Error>(read_back == HEALTH_CHECK_DATA)
            };
            match check.await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(StorageError::HealthCheck(format!(
                        "data mismatch in {}",
                        dir.display()
                    )));
                }
                Err(e) => {
                    let _ = remove_file_if_exists(&probe).await;
                    return Err(StorageError::HealthCheck(format!("{}: {e}", dir.display())));
                }
            }
        }
        Ok(())
    }
}

/// Copies `from` to `to` and checks the copy is non-empty.
///
/// A failed or empty copy is removed so no partial artifact is left behind.
async fn copy_verified(from: &Path, to: &Path) -> StorageResult<()> {
    if let Err(e) = tokio::fs::copy(from, to).await {
        let _ = remove_file_if_exists(to).await;
        return Err(StorageError::CopyVerificationFailed {
            path: to.to_path_buf(),
            reason: e.to_string(),
        });
    }
    if non_empty_size(to).await.is_none() {
        let _ = remove_file_if_exists(to).await;
        return Err(StorageError::CopyVerificationFailed {
            path: to.to_path_buf(),
            reason: "copy is empty".to_string(),
        });
    }
    Ok(())
}
