//! Document storage layer for DocWallet.
//!
//! Persists imported files durably and confidentially, and produces transient
//! cleartext copies for viewing without leaving decrypted originals at rest.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/                      # legacy flat layout (read fallback)
//!   encrypted/<id>_<name>      # DWENC2 envelopes (canonical)
//!   documents/<id>_<name>      # unencrypted documents
//! <cache>/
//!   preview_<token>.<ext>      # temporary preview copies
//!   preview_<id>_<name>        # memoized decrypted previews
//! ```
//!
//! Reads probe `encrypted/`, `documents/`, then the root, in that order.
//!
//! # Concurrency
//!
//! Operations on different documents are independent. Callers must serialize
//! writes to the same document (e.g. never `save_file` and `delete_file` the
//! same id concurrently). Every entry point awaits a one-time directory
//! initialization first.

pub mod config;
mod document_storage;
mod error;
mod file_crypto;
mod fs_util;
pub mod layout;
pub mod preview;
pub mod reporter;

pub use config::StorageConfig;
pub use document_storage::{DocumentStorage, FileInfo, SavedFile};
pub use error::{StorageError, StorageResult};
pub use file_crypto::FileEncryption;
pub use layout::{
    stored_filename_for, LocatedFile, LocationKind, StorageLayout, StorageLocation,
};
pub use preview::{CleanupFailure, CleanupReport, PreviewManager, PREVIEW_PREFIX};
pub use reporter::{ErrorReporter, TracingReporter};
