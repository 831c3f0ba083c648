//! Import pipeline for DocWallet.
//!
//! Turns file-picker results into locally readable files. Picked files may be
//! plain local files, content-provider URIs, or virtual cloud documents with
//! no byte stream of their own; each is resolved with:
//! - a direct filesystem copy into the cache directory, then
//! - the picker's own local-copy facility, which understands content
//!   providers and can export virtual cloud documents to a concrete type.
//!
//! A file that cannot be resolved is dropped; the rest of the import proceeds.

pub mod error;
pub mod importer;
pub mod picker;

pub use error::{ImportError, ImportResult, UNSUPPORTED_FILE_TYPE_MESSAGE};
pub use importer::{is_cloud_document_provider, DocumentImporter, ImportOptions};
pub use picker::{
    ConvertibleType, CopyDestination, DirectoryHandle, DocumentPicker, LocalCopyRequest,
    LocalCopyResult, PickOutcome, PickRequest, PickedFile, PickerError,
};
