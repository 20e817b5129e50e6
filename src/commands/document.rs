//! Commands for document upload, preview and analysis.

use std::path::Path;

use serde::Serialize;

use super::AppState;
use crate::agent_core::ChatSession;
use crate::documents::{load_document_from_path, LoadedDocument};

/// What the user sees after a successful upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPreview {
    pub filename: String,
    pub format: String,
    pub char_count: usize,
    pub preview: String,
}

impl DocumentPreview {
    fn new(document: &LoadedDocument, preview_chars: usize) -> Self {
        Self {
            filename: document.filename.clone(),
            format: document.kind.label().to_string(),
            char_count: document.char_count(),
            preview: document.preview(preview_chars),
        }
    }
}

/// Load a PDF or DOCX from disk into the session and return its preview.
///
/// A failed load leaves any previously loaded document in place.
pub fn upload_document(
    state: &AppState,
    session: &mut ChatSession,
    path: &Path,
) -> Result<DocumentPreview, String> {
    let document = load_document_from_path(path).map_err(|e| format!("{e}"))?;
    let preview = DocumentPreview::new(
        &document,
        state.orchestrator.review_config().preview_chars,
    );
    session.set_document(document);
    Ok(preview)
}

/// Review the session's loaded document against the ethics guidelines.
pub async fn analyze_document(
    state: &AppState,
    session: &mut ChatSession,
) -> Result<String, String> {
    state
        .orchestrator
        .analyze_loaded_document(session)
        .await
        .map_err(|e| format!("{e}"))
}
