//! Document error types.

use thiserror::Error;

/// Errors while loading an uploaded document or extracting its text.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file name does not end in `.pdf` or `.docx`.
    #[error("unsupported file '{filename}': only PDF and DOCX are supported")]
    UnsupportedFormat { filename: String },

    /// The file body could not be parsed as the format its suffix claims.
    #[error("failed to extract text from {format}: {reason}")]
    Extraction { format: &'static str, reason: String },

    /// The file could not be read from disk.
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Extraction succeeded but produced no text.
    #[error("no text could be extracted from '{filename}'")]
    EmptyText { filename: String },
}

impl DocumentError {
    pub(crate) fn pdf(reason: impl ToString) -> Self {
        DocumentError::Extraction {
            format: "PDF",
            reason: reason.to_string(),
        }
    }

    pub(crate) fn docx(reason: impl ToString) -> Self {
        DocumentError::Extraction {
            format: "DOCX",
            reason: reason.to_string(),
        }
    }
}

impl From<lopdf::Error> for DocumentError {
    fn from(e: lopdf::Error) -> Self {
        DocumentError::pdf(e)
    }
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(e: zip::result::ZipError) -> Self {
        DocumentError::docx(e)
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(e: quick_xml::Error) -> Self {
        DocumentError::docx(e)
    }
}
