//! Review prompt construction.

use crate::config::ReviewConfig;
use crate::documents::LoadedDocument;

/// Placeholder replaced by the document excerpt.
pub const DOCUMENT_PLACEHOLDER: &str = "{document}";

/// Build the review prompt for `document`: the template with the first
/// `analysis_chars` characters of its text in place of `{document}`.
pub fn build_review_prompt(review: &ReviewConfig, document: &LoadedDocument) -> String {
    review
        .prompt_template
        .replacen(DOCUMENT_PLACEHOLDER, document.excerpt(review.analysis_chars), 1)
}
