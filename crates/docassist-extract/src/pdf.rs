//! PDF document text extraction

use crate::error::Result;
use lopdf::Document;
use tracing::debug;

/// Extract text from PDF bytes, page by page in document order.
///
/// A page whose text cannot be decoded contributes an empty string.
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let mut text = String::new();
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => debug!(page = page_num, error = %e, "PDF page yielded no text"),
        }
    }

    debug!(page_count = pages.len(), chars = text.len(), "Extracted PDF text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractError;

    #[test]
    fn test_garbage_is_extraction_failure() {
        let err = extract_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ExtractionFailed { format: "PDF", .. }
        ));
    }
}
