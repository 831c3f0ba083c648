//! Picker-driven import with two-tier local-copy resolution.

use crate::error::{ImportError, ImportResult};
use crate::picker::{
    ConvertibleType, CopyDestination, DirectoryHandle, DocumentPicker, LocalCopyRequest,
    LocalCopyResult, PickOutcome, PickRequest, PickedFile,
};
use docwallet_types::{sanitize_filename, DocumentType, ImportedDocument};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

const DOCUMENT_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png", "text/plain"];
const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];
const PDF_MIME_TYPES: &[&str] = &["application/pdf"];
const ANY_MIME_TYPE: &[&str] = &["*/*"];

/// Content-provider hosts serving cloud-native documents.
const CLOUD_DOCUMENT_HOSTS: &[&str] = &["com.google.android.apps.docs"];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Whether `uri` points at a cloud-document content provider.
pub fn is_cloud_document_provider(uri: &str) -> bool {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .is_some_and(|host| CLOUD_DOCUMENT_HOSTS.iter().any(|p| host.starts_with(p)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub allow_multiple: bool,
    /// Resolve virtual files instead of skipping them.
    pub allow_virtual_files: bool,
    /// Overrides the default MIME filter of the import call.
    pub mime_types: Option<Vec<String>>,
}

impl ImportOptions {
    pub fn multiple() -> Self {
        Self {
            allow_multiple: true,
            ..Self::default()
        }
    }
}

/// Runs the picker and resolves every result to a local file.
#[derive(Clone)]
pub struct DocumentImporter {
    picker: Arc<dyn DocumentPicker>,
    cache_dir: PathBuf,
}

impl DocumentImporter {
    /// `cache_dir` receives direct copies; it should be the same transient
    /// area the storage layer treats as cache.
    pub fn new(picker: Arc<dyn DocumentPicker>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            picker,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub async fn import_document(&self, options: ImportOptions) -> ImportResult<Vec<ImportedDocument>> {
        self.import_with(DOCUMENT_MIME_TYPES, options).await
    }

    pub async fn import_image(&self, options: ImportOptions) -> ImportResult<Vec<ImportedDocument>> {
        self.import_with(IMAGE_MIME_TYPES, options).await
    }

    pub async fn import_pdf(&self, options: ImportOptions) -> ImportResult<Vec<ImportedDocument>> {
        self.import_with(PDF_MIME_TYPES, options).await
    }

    /// Imports any file type, opting in to virtual/cloud files.
    pub async fn import_virtual_document(
        &self,
        options: ImportOptions,
    ) -> ImportResult<Vec<ImportedDocument>> {
        let options = ImportOptions {
            allow_virtual_files: true,
            ..options
        };
        self.import_with(ANY_MIME_TYPE, options).await
    }

    /// Picks with `default_mime_types` (unless overridden) and resolves the results.
    ///
    /// Cancellation yields an empty list. Files that fail resolution are dropped.
    pub async fn import_with(
        &self,
        default_mime_types: &[&str],
        options: ImportOptions,
    ) -> ImportResult<Vec<ImportedDocument>> {
        let request = PickRequest {
            mime_types: options
                .mime_types
                .clone()
                .unwrap_or_else(|| default_mime_types.iter().map(|m| m.to_string()).collect()),
            allow_multiple: options.allow_multiple,
        };

        let picked = match self.picker.pick(&request).await {
            Ok(PickOutcome::Cancelled) => {
                debug!("picker cancelled");
                return Ok(Vec::new());
            }
            Ok(PickOutcome::Picked(files)) => files,
            Err(e) => {
                warn!("document picker failed: {e}");
                return Err(ImportError::from_picker(e));
            }
        };

        let mut imported = Vec::with_capacity(picked.len());
        for file in &picked {
            if file.is_virtual && !options.allow_virtual_files {
                debug!("skipping virtual file {}", file.uri);
                continue;
            }
            if let Some(doc) = self.resolve_local_copy(file).await {
                imported.push(doc);
            }
        }

        debug!("imported {} of {} picked files", imported.len(), picked.len());
        Ok(imported)
    }

    /// Resolves one picked file to a local copy, or `None` if both strategies fail.
    pub async fn resolve_local_copy(&self, file: &PickedFile) -> Option<ImportedDocument> {
        match self.direct_copy(file).await {
            Ok(local) => return Some(self.describe(file, local, None).await),
            Err(e) => debug!("direct copy of {} failed, trying picker copy: {e}", file.uri),
        }

        let (local, conversion) = self.library_copy(file).await?;
        Some(self.describe(file, local, conversion).await)
    }

    pub async fn select_directory(
        &self,
        request_long_term_access: bool,
    ) -> ImportResult<Option<DirectoryHandle>> {
        self.picker
            .pick_directory(request_long_term_access)
            .await
            .map_err(|e| {
                warn!("directory picker failed: {e}");
                ImportError::from_picker(e)
            })
    }

    // ── Resolution strategies ───────────────────────────────────────

    async fn direct_copy(&self, file: &PickedFile) -> io::Result<PathBuf> {
        let source = local_path_from_uri(&file.uri).ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "not a local file uri")
        })?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let dest = self
            .cache_dir
            .join(format!("import_{}_{}", Uuid::new_v4(), sanitize_filename(&file.name)));

        let copied = match tokio::fs::copy(&source, &dest).await {
            Ok(n) => n,
            Err(e) => {
                let _ = tokio::fs::remove_file(&dest).await;
                return Err(e);
            }
        };
        if copied == 0 {
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(io::Error::new(io::ErrorKind::InvalidData, "copied file is empty"));
        }
        Ok(dest)
    }

    async fn library_copy(&self, file: &PickedFile) -> Option<(PathBuf, Option<ConvertibleType>)> {
        let conversion = if is_cloud_document_provider(&file.uri) && file.is_virtual {
            file.convertible_to_mime_types.first().cloned()
        } else {
            None
        };

        let request = LocalCopyRequest {
            uri: file.uri.clone(),
            file_name: match &conversion {
                Some(c) => with_extension(&file.name, &c.extension),
                None => file.name.clone(),
            },
            convert_virtual_file_to_type: conversion.as_ref().map(|c| c.mime_type.clone()),
        };

        let results = match self
            .picker
            .keep_local_copy(std::slice::from_ref(&request), CopyDestination::CachesDirectory)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!("picker local copy of {} failed: {e}", file.uri);
                return None;
            }
        };

        match results.into_iter().next() {
            Some(LocalCopyResult::Success { local_uri, .. }) => Some((local_uri, conversion)),
            Some(LocalCopyResult::Error { copy_error, .. }) => {
                warn!("picker could not copy {}: {copy_error}", file.uri);
                None
            }
            None => {
                warn!("picker returned no copy result for {}", file.uri);
                None
            }
        }
    }

    async fn describe(
        &self,
        file: &PickedFile,
        local_uri: PathBuf,
        conversion: Option<ConvertibleType>,
    ) -> ImportedDocument {
        let size = match tokio::fs::metadata(&local_uri).await {
            Ok(meta) => meta.len(),
            Err(_) => file.size.unwrap_or(0),
        };

        let (name, mime_type) = match conversion {
            Some(c) => (with_extension(&file.name, &c.extension), c.mime_type),
            None => (
                file.name.clone(),
                file.mime_type
                    .clone()
                    .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
            ),
        };

        ImportedDocument {
            original_uri: file.uri.clone(),
            local_uri,
            name,
            size,
            doc_type: DocumentType::from_mime(&mime_type),
            mime_type,
        }
    }
}

/// Maps `file://` URIs and bare absolute paths to a filesystem path.
fn local_path_from_uri(uri: &str) -> Option<PathBuf> {
    if uri.starts_with("file:") {
        return Url::parse(uri).ok()?.to_file_path().ok();
    }
    let path = Path::new(uri);
    path.is_absolute().then(|| path.to_path_buf())
}

fn with_extension(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension.to_ascii_lowercase());
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cloud_document_provider() {
        assert!(is_cloud_document_provider(
            "content://com.google.android.apps.docs.storage/document/acc%3D1%3Bdoc%3Dencoded"
        ));
        assert!(is_cloud_document_provider(
            "content://com.google.android.apps.docs.storage.legacy/enc%3Dabc"
        ));
        assert!(!is_cloud_document_provider(
            "content://com.android.providers.downloads.documents/document/42"
        ));
        assert!(!is_cloud_document_provider("/tmp/local.pdf"));
    }

    #[test]
    fn local_paths_from_uris() {
        assert_eq!(
            local_path_from_uri("file:///tmp/a%20b.pdf"),
            Some(PathBuf::from("/tmp/a b.pdf"))
        );
        assert_eq!(local_path_from_uri("/tmp/x.pdf"), Some(PathBuf::from("/tmp/x.pdf")));
        assert_eq!(local_path_from_uri("content://provider/doc/1"), None);
        assert_eq!(local_path_from_uri("relative/x.pdf"), None);
    }

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(with_extension("Meeting notes", "docx"), "Meeting notes.docx");
        assert_eq!(with_extension("Report.DOCX", "docx"), "Report.DOCX");
    }
}
