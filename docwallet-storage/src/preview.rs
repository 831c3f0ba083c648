//! Temporary cleartext copies in the cache directory.
//!
//! Everything named `preview_*` in the cache is disposable: it can be
//! deleted at any time without losing document data.

use crate::error::{StorageError, StorageResult};
use crate::fs_util::remove_file_if_exists;
use crate::layout::is_within;
use crate::reporter::ErrorReporter;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Filename prefix shared by every preview file.
pub const PREVIEW_PREFIX: &str = "preview_";

const FALLBACK_EXTENSION: &str = "tmp";

#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Outcome of a best-effort cleanup. Never an error at the call site.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Preview files a delete was attempted on.
    pub attempted: usize,
    pub removed: usize,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Counts a successful delete. `false` means the file was already gone.
    fn record_removal(&mut self, removed: bool) {
        if removed {
            self.removed += 1;
        }
    }
}

#[derive(Clone)]
pub struct PreviewManager {
    cache_dir: PathBuf,
    reporter: Arc<dyn ErrorReporter>,
}

impl PreviewManager {
    pub fn new(cache_dir: impl Into<PathBuf>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            reporter,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Copies `source` to `preview_<uuid>.<ext>` in the cache.
    ///
    /// The extension is `preferred_extension`, else the source's own, else `tmp`.
    pub async fn create_temporary_preview_file(
        &self,
        source: &Path,
        preferred_extension: Option<&str>,
    ) -> StorageResult<PathBuf> {
        let extension = preferred_extension
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                source
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

        let target = self
            .cache_dir
            .join(format!("{PREVIEW_PREFIX}{}.{extension}", Uuid::new_v4()));

        if let Err(e) = tokio::fs::copy(source, &target).await {
            let _ = remove_file_if_exists(&target).await;
            return Err(StorageError::PreviewCreationFailed(e));
        }

        debug!("created preview {}", target.display());
        Ok(target)
    }

    /// Deletes a preview file. Paths outside the cache directory are refused.
    ///
    /// Returns whether a file was present and removed.
    pub async fn delete_preview_file(&self, preview: &Path) -> bool {
        if !is_within(&self.cache_dir, preview) {
            warn!(
                "refusing to delete {} outside the cache directory",
                preview.display()
            );
            return false;
        }

        match remove_file_if_exists(preview).await {
            Ok(removed) => removed,
            Err(e) => {
                self.reporter.report("failed to delete preview file", &e);
                false
            }
        }
    }

    /// Deletes every `preview_*` entry in the cache directory.
    pub async fn cleanup_temporary_preview_files(&self) -> CleanupReport {
        let mut report = CleanupReport::default();

        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
            Err(e) => {
                self.reporter.report("failed to list preview cache", &e);
                report.failures.push(CleanupFailure {
                    path: self.cache_dir.clone(),
                    error: e,
                });
                return report;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    self.reporter.report("failed to list preview cache", &e);
                    report.failures.push(CleanupFailure {
                        path: self.cache_dir.clone(),
                        error: e,
                    });
                    break;
                }
            };

            if !entry
                .file_name()
                .to_string_lossy()
                .starts_with(PREVIEW_PREFIX)
            {
                continue;
            }

            let path = entry.path();
            report.attempted += 1;
            match remove_file_if_exists(&path).await {
                Ok(removed) => report.record_removal(removed),
                Err(e) => {
                    self.reporter.report("failed to delete preview file", &e);
                    report.failures.push(CleanupFailure { path, error: e });
                }
            }
        }

        if report.attempted > 0 {
            info!(
                "preview cleanup removed {}/{} files",
                report.removed, report.attempted
            );
        }
        report
    }

    pub async fn cleanup_preview_files(&self) -> CleanupReport {
        self.cleanup_temporary_preview_files().await
    }
}
