//! Format dispatch for uploaded documents.
//!
//! The format is decided by file name suffix alone, before any bytes are
//! inspected. Anything other than `.pdf` or `.docx` is rejected without
//! running an extractor.

use std::path::Path;

use super::errors::DocumentError;
use super::{docx, pdf};

/// Marker appended to every preview.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Pick the format from a file name suffix (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(DocumentKind::Docx)
        } else {
            Err(DocumentError::UnsupportedFormat {
                filename: filename.to_string(),
            })
        }
    }

    /// Run this format's extractor over the raw bytes.
    pub fn extract_text(self, bytes: &[u8]) -> Result<String, DocumentError> {
        match self {
            DocumentKind::Pdf => pdf::extract_text(bytes),
            DocumentKind::Docx => docx::extract_text(bytes),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
        }
    }
}

/// An uploaded document after text extraction. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub text: String,
}

impl LoadedDocument {
    /// First `max_chars` characters followed by the ellipsis marker.
    pub fn preview(&self, max_chars: usize) -> String {
        format!("{}{PREVIEW_ELLIPSIS}", truncate_chars(&self.text, max_chars))
    }

    /// First `max_chars` characters, no marker.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        truncate_chars(&self.text, max_chars)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extract text from an in-memory upload.
///
/// `filename` decides the format; an unsupported suffix returns before the
/// bytes are touched. Empty extracted text is an error so nothing downstream
/// previews or analyzes a blank document.
pub fn load_document(filename: &str, bytes: &[u8]) -> Result<LoadedDocument, DocumentError> {
    let kind = DocumentKind::from_filename(filename)?;

    if kind == DocumentKind::Pdf && !pdf::is_pdf(bytes) {
        tracing::warn!(filename = %filename, "file has a .pdf suffix but no PDF header");
    }

    let text = kind.extract_text(bytes).inspect_err(|e| {
        tracing::warn!(filename = %filename, error = %e, "text extraction failed");
    })?;

    if text.is_empty() {
        return Err(DocumentError::EmptyText {
            filename: filename.to_string(),
        });
    }

    let doc = LoadedDocument {
        filename: filename.to_string(),
        kind,
        text,
    };
    tracing::info!(
        filename = %doc.filename,
        format = doc.kind.label(),
        chars = doc.char_count(),
        "document loaded"
    );
    Ok(doc)
}

/// Read a file from disk and extract its text.
pub fn load_document_from_path(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Reject by suffix before reading the file.
    DocumentKind::from_filename(&filename)?;

    let bytes = std::fs::read(path).map_err(|e| DocumentError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    load_document(&filename, &bytes)
}

/// Borrow at most `max_chars` characters from the front of `s`.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is never
/// split mid-character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
