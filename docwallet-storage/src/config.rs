//! Storage configuration.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DOCWALLET_DATA_DIR` | Legacy root; holds `encrypted/` and `documents/` | platform data dir |
//! | `DOCWALLET_CACHE_DIR` | Transient area for imports and previews | platform cache dir |

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the storage root.
pub const DATA_DIR_ENV: &str = "DOCWALLET_DATA_DIR";

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "DOCWALLET_CACHE_DIR";

const DEFAULT_ENCRYPTED_SUBDIR: &str = "encrypted";
const DEFAULT_DOCUMENTS_SUBDIR: &str = "documents";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Legacy flat root. The encrypted and documents directories live under it.
    pub root_dir: PathBuf,

    /// Transient cache area. Anything here may be deleted at any time.
    pub cache_dir: PathBuf,

    #[serde(default = "default_encrypted_subdir")]
    pub encrypted_subdir: String,

    #[serde(default = "default_documents_subdir")]
    pub documents_subdir: String,
}

fn default_encrypted_subdir() -> String {
    DEFAULT_ENCRYPTED_SUBDIR.to_string()
}

fn default_documents_subdir() -> String {
    DEFAULT_DOCUMENTS_SUBDIR.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        match ProjectDirs::from("io", "DocWallet", "DocWallet") {
            Some(dirs) => Self::with_dirs(dirs.data_dir(), dirs.cache_dir()),
            None => Self::for_root(std::env::temp_dir().join("docwallet")),
        }
    }
}

impl StorageConfig {
    /// Self-contained layout with the cache under `<root>/cache`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::with_dirs(root, root.join("cache"))
    }

    pub fn with_dirs(root: impl Into<PathBuf>, cache: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root.into(),
            cache_dir: cache.into(),
            encrypted_subdir: default_encrypted_subdir(),
            documents_subdir: default_documents_subdir(),
        }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.root_dir = PathBuf::from(root);
        }
        if let Some(cache) = lookup(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
            config.cache_dir = PathBuf::from(cache);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_root_nests_cache() {
        let config = StorageConfig::for_root("/tmp/dw");
        assert_eq!(config.root_dir, PathBuf::from("/tmp/dw"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/dw/cache"));
        assert_eq!(config.encrypted_subdir, "encrypted");
        assert_eq!(config.documents_subdir, "documents");
    }

    #[test]
    fn env_overrides_apply() {
        let config = StorageConfig::from_lookup(|key| match key {
            DATA_DIR_ENV => Some("/srv/docwallet".into()),
            CACHE_DIR_ENV => Some("/var/cache/docwallet".into()),
            _ => None,
        });
        assert_eq!(config.root_dir, PathBuf::from("/srv/docwallet"));
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/docwallet"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let defaults = StorageConfig::default();
        let config = StorageConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config, defaults);
    }

    #[test]
    fn subdirs_default_when_deserializing() {
        let config: StorageConfig = serde_json::from_str(
            r#"{ "root_dir": "/data", "cache_dir": "/cache" }"#,
        )
        .unwrap();
        assert_eq!(config.encrypted_subdir, "encrypted");
        assert_eq!(config.documents_subdir, "documents");
    }
}
