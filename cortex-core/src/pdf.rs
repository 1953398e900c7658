//! PDF text extraction.
//!
//! Thin wrapper around lopdf: load a document, pull the text of every page
//! in order, and refuse PDFs that yield nothing (scanned or image-only
//! documents).

use lopdf::Document;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during PDF processing
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF file: {0}")]
    OpenError(String),

    #[error("Failed to read PDF: {0}")]
    ReadError(#[from] lopdf::Error),

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("PDF appears empty or is scanned (no extractable text)")]
    NoText,
}

/// Extract the full text of a PDF, page texts joined in page order.
///
/// Returns [`PdfError::NoText`] when the document has pages but none of
/// them yield non-whitespace text.
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    debug!("Loading PDF from: {}", path.display());

    let doc = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(PdfError::EmptyDocument);
    }
    page_numbers.sort_unstable();

    debug!("PDF has {} pages", page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_num in page_numbers {
        // A single unreadable page should not sink the document
        let text = doc
            .extract_text(&[page_num])
            .unwrap_or_else(|_| String::new());
        pages.push(text);
    }

    let text = pages.join("\n");
    if text.trim().is_empty() {
        return Err(PdfError::NoText);
    }

    Ok(text)
}
