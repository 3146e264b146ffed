//! Bounded text extraction from uploaded PDFs.
//!
//! Decodes the embedded text layer page by page and stops once the caller's
//! character budget is met. Scanned/image-only documents have no usable text
//! layer; that surfaces as an [`ExtractionError`] the callers recover from
//! (fail-open at the gate, empty-text substitution in the orchestrator).

use thiserror::Error;

use crate::document::UploadedDocument;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),
}

/// Seam over the PDF text-layer decoder.
pub trait PdfDecoder: Send + Sync {
    /// Visible text of every page, in page order.
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Production decoder backed by the `pdf-extract` crate.
///
/// `pdf_extract` returns the whole document with form feeds (`\x0C`) between
/// pages, so pages are recovered by splitting on those.
pub struct PdfTextDecoder;

impl PdfDecoder for PdfTextDecoder {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
        Ok(text.split('\x0C').map(|page| page.to_string()).collect())
    }
}

/// Extract at most `max_chars` characters from `doc`.
///
/// Pages are concatenated in order, each followed by a newline, stopping as
/// soon as the budget is reached; the result is truncated to exactly
/// `max_chars` characters (on a char boundary). Purely reads.
pub fn extract_text(
    decoder: &dyn PdfDecoder,
    doc: &UploadedDocument,
    max_chars: usize,
) -> Result<String, ExtractionError> {
    let pages = decoder.page_texts(&doc.bytes)?;

    let mut out = String::new();
    let mut chars = 0usize;
    for page in pages {
        out.push_str(&page);
        out.push('\n');
        chars += page.chars().count() + 1;
        if chars >= max_chars {
            break;
        }
    }

    if chars > max_chars {
        out = out.chars().take(max_chars).collect();
    }
    Ok(out)
}
