//! DOCX text extraction.
//!
//! A DOCX file is a zip archive; the body lives in `word/document.xml`.
//! Text is read from body-level paragraphs only (`w:p` directly under
//! `w:body`), one line per paragraph. Paragraphs inside tables, text boxes
//! and headers are not part of that list.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::errors::DocumentError;

/// Archive entry holding the main document part.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body paragraphs joined with `\n`.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)?
        .read_to_string(&mut xml)
        .map_err(DocumentError::docx)?;

    let paragraphs = body_paragraphs(&xml)?;
    tracing::debug!(paragraphs = paragraphs.len(), "extracted DOCX text");
    Ok(paragraphs.join("\n"))
}

/// Collect the text of every body-level paragraph in document order.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(xml);

    // Local names of the currently open elements, outermost first.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"p" && parent_is_body(&stack) {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" if parent_is_body(&stack) => paragraphs.push(String::new()),
                    b"tab" if in_body_run(&stack) => push_to(&mut current, "\t"),
                    b"br" if in_body_run(&stack) && !is_layout_break(&e) => {
                        push_to(&mut current, "\n")
                    }
                    b"cr" if in_body_run(&stack) => push_to(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(t) => {
                if stack.last().is_some_and(|n| n == b"t") && paragraph_depth(&stack) == 1 {
                    let text = t.unescape().map_err(DocumentError::docx)?;
                    push_to(&mut current, &text);
                }
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    if name == b"p" && parent_is_body(&stack) {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|n| n == b"body")
}

fn paragraph_depth(stack: &[Vec<u8>]) -> usize {
    stack.iter().filter(|n| n.as_slice() == b"p").count()
}

/// Inside a run of a body-level paragraph. Excludes `w:tab` stops declared
/// in paragraph properties.
fn in_body_run(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|n| n == b"r") && paragraph_depth(stack) == 1
}

/// Page and column breaks move layout, not text.
fn is_layout_break(br: &BytesStart) -> bool {
    br.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"type"
            && matches!(attr.value.as_ref(), b"page" | b"column")
    })
}

fn push_to(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
