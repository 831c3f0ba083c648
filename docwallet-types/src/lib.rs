//! Core types shared by the DocWallet crates.
//!
//! The document record itself is owned by the metadata layer; the types here
//! cover the fields that the storage and encryption layers produce and consume:
//! the stored filename, the content reference (plain path or `encrypted:<id>`
//! sentinel) and the document type used for view hints.

mod content;
mod doc_type;
mod document;
mod filename;
mod imported;

pub use content::{ContentRef, StoredContent, ENCRYPTED_CONTENT_PREFIX};
pub use doc_type::DocumentType;
pub use document::{Document, DocumentId, DocumentMetadata, InvalidDocumentId};
pub use filename::sanitize_filename;
pub use imported::ImportedDocument;
