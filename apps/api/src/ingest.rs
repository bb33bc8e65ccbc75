//! Document ingestion — raw PDF bytes → one plain-text blob.
//!
//! Pages are read in page order with pdf-extract (font encodings and ToUnicode maps
//! included) and concatenated; pages that yield no text are skipped.
//! A document that cannot be opened at all is the one pipeline failure that reaches
//! the caller, since there is nothing to extract against.
//! CPU-bound: callers run this inside `tokio::task::spawn_blocking`.

use thiserror::Error;
use tracing::{debug, info};

/// Prefix length of the document text kept on the stored proposal row.
pub const STORED_TEXT_LIMIT: usize = 5000;

/// Window in which the `%PDF-` header must appear.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document is empty")]
    Empty,

    #[error("document is not a PDF")]
    NotPdf,

    #[error("failed to load PDF: {0}")]
    Load(String),
}

/// Extracts the text layer of a PDF, page by page.
pub fn extract_document_text(data: &[u8]) -> Result<String, IngestError> {
    if data.is_empty() {
        return Err(IngestError::Empty);
    }
    if !has_pdf_header(data) {
        return Err(IngestError::NotPdf);
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| IngestError::Load(e.to_string()))?;
    let page_count = pages.len();
    let text = join_page_texts(pages);

    info!(
        "Extracted {} chars of text from {page_count} pages",
        text.chars().count()
    );
    Ok(text)
}

/// Concatenates page texts in order, skipping pages with no text.
pub fn join_page_texts<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .enumerate()
        .filter(|(index, text)| {
            let blank = text.trim().is_empty();
            if blank {
                debug!("Page {} yielded no text", index + 1);
            }
            !blank
        })
        .map(|(_, text)| text)
        .collect()
}

/// First `STORED_TEXT_LIMIT` characters, for persistence only. NUL characters are
/// dropped since Postgres TEXT cannot hold them.
pub fn truncate_for_storage(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\0')
        .take(STORED_TEXT_LIMIT)
        .collect()
}

fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use pdf_extract::content::{Content, Operation};
    use pdf_extract::{dictionary, Document, Object, Stream};

    use super::*;

    /// Builds an uncompressed PDF with one Helvetica text line per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => lines.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
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
    fn test_extracts_pages_in_order() {
        let pdf = pdf_with_pages(&["RAM: 16GB", "Price: $45,000"]);

        let text = extract_document_text(&pdf).unwrap();

        let ram = text.find("RAM: 16GB").expect("first page text");
        let price = text.find("Price: $45,000").expect("second page text");
        assert!(ram < price);
    }

    #[test]
    fn test_join_keeps_page_order() {
        let text = join_page_texts(vec!["Page one. ".to_string(), "Page two.".to_string()]);
        assert_eq!(text, "Page one. Page two.");
    }

    #[test]
    fn test_join_skips_empty_pages() {
        let text = join_page_texts(vec![
            "RAM: 16GB\n".to_string(),
            String::new(),
            "  \n".to_string(),
            "Price: $45,000\n".to_string(),
        ]);
        assert_eq!(text, "RAM: 16GB\nPrice: $45,000\n");
    }

    #[test]
    fn test_join_all_pages_empty() {
        assert_eq!(join_page_texts(vec![String::new(), " ".to_string()]), "");
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(extract_document_text(b""), Err(IngestError::Empty)));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert!(matches!(extract_document_text(png), Err(IngestError::NotPdf)));
    }

    #[test]
    fn test_corrupt_pdf_is_load_error() {
        let corrupt = b"%PDF-1.7\nthis is not a real document body";
        assert!(matches!(
            extract_document_text(corrupt),
            Err(IngestError::Load(_))
        ));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "€".repeat(STORED_TEXT_LIMIT + 10);
        let stored = truncate_for_storage(&text);
        assert_eq!(stored.chars().count(), STORED_TEXT_LIMIT);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_for_storage("short"), "short");
    }

    #[test]
    fn test_truncate_drops_nul_characters() {
        assert_eq!(truncate_for_storage("RAM\0: 16\0GB"), "RAM: 16GB");
    }
}
