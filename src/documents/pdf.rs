//! PDF text extraction.

use lopdf::Document;

use super::errors::DocumentError;

/// Extract the text of every page, in page order, concatenated as-is.
///
/// No separator is inserted between pages beyond what each page's text
/// already ends with.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let mut text = String::new();
    for page_number in pages.keys() {
        let page_text = doc.extract_text(&[*page_number])?;
        text.push_str(&page_text);
    }

    tracing::debug!(
        pages = pages.len(),
        chars = text.chars().count(),
        "extracted PDF text"
    );
    Ok(text)
}

/// Whether the bytes start with the PDF magic header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

#[cfg(test)]
pub(crate) mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;

    /// Build an in-memory PDF with one page per entry in `pages`.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_two_pages_concatenate_in_order() {
        let bytes = build_pdf(&["First page", "Second page"]);
        let text = extract_text(&bytes).unwrap();

        let first = text.find("First page").expect("first page text");
        let second = text.find("Second page").expect("second page text");
        assert!(first < second);

        // Nothing beyond each page's own text is injected between pages.
        let doc = Document::load_mem(&bytes).unwrap();
        let page1 = doc.extract_text(&[1]).unwrap();
        let page2 = doc.extract_text(&[2]).unwrap();
        assert_eq!(text, format!("{page1}{page2}"));
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let err = extract_text(b"%PDF-1.4 this is not really a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Extraction { format: "PDF", .. }));
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(&build_pdf(&["x"])));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b"%PD"));
    }
}
