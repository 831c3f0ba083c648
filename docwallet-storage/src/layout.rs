//! Storage locations and the stored-filename resolver.
//!
//! The layout has changed over time. Instead of a schema version, the read
//! path walks an ordered list of locations; adding or retiring a layout is a
//! change to [`StorageLayout::locations`] only.

use crate::config::StorageConfig;
use crate::preview::PREVIEW_PREFIX;
use docwallet_types::{sanitize_filename, DocumentId};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Encrypted,
    Documents,
    LegacyRoot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub kind: LocationKind,
    pub dir: PathBuf,
    /// Why this location is probed.
    pub reason: &'static str,
}

/// Result of resolving a stored filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
    pub kind: LocationKind,
    pub path: PathBuf,
    /// Copies with the same name at lower-priority locations.
    pub shadowed: Vec<PathBuf>,
}

/// `<document id>_<sanitized basename>`.
pub fn stored_filename_for(document_id: &DocumentId, name: &str) -> String {
    format!("{document_id}_{}", sanitize_filename(name))
}

#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
    encrypted_dir: PathBuf,
    documents_dir: PathBuf,
    cache_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root_dir.clone(),
            encrypted_dir: config.root_dir.join(&config.encrypted_subdir),
            documents_dir: config.root_dir.join(&config.documents_subdir),
            cache_dir: config.cache_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn encrypted_dir(&self) -> &Path {
        &self.encrypted_dir
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Read probe order, highest priority first.
    pub fn locations(&self) -> [StorageLocation; 3] {
        [
            StorageLocation {
                kind: LocationKind::Encrypted,
                dir: self.encrypted_dir.clone(),
                reason: "canonical encrypted storage",
            },
            StorageLocation {
                kind: LocationKind::Documents,
                dir: self.documents_dir.clone(),
                reason: "unencrypted documents and pre-encryption layout",
            },
            StorageLocation {
                kind: LocationKind::LegacyRoot,
                dir: self.root.clone(),
                reason: "original flat layout",
            },
        ]
    }

    /// Directories created at initialization.
    pub fn required_dirs(&self) -> [&Path; 4] {
        [
            self.root.as_path(),
            self.encrypted_dir.as_path(),
            self.documents_dir.as_path(),
            self.cache_dir.as_path(),
        ]
    }

    pub fn is_in_cache(&self, path: &Path) -> bool {
        is_within(&self.cache_dir, path)
    }

    /// Memoized decrypted preview for a stored file.
    pub fn preview_cache_path(&self, stored_filename: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{PREVIEW_PREFIX}{stored_filename}"))
    }
}

/// Whether `path` lies under `dir` without `..` escapes.
pub(crate) fn is_within(dir: &Path, path: &Path) -> bool {
    !path.components().any(|c| matches!(c, Component::ParentDir)) && path.starts_with(dir)
}

/// A stored filename must be a single plain path component.
pub(crate) fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
