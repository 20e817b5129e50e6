//! Documents: plain-text extraction from uploaded PDF and DOCX files.
//!
//! - `extractor`: suffix dispatch, `LoadedDocument`, preview/excerpt
//! - `pdf`: page-ordered text via `lopdf`
//! - `docx`: body paragraphs via `zip` + `quick-xml`
//! - `errors`: `DocumentError`

pub mod docx;
pub mod errors;
pub mod extractor;
pub mod pdf;

// Re-exports for convenience
pub use errors::DocumentError;
pub use extractor::{
    load_document, load_document_from_path, truncate_chars, DocumentKind, LoadedDocument,
};
