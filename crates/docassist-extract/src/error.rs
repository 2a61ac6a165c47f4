//! Error types for text extraction

use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while turning an upload into plain text
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No handler is registered for the content type
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The format is recognized but nothing can extract text from it
    #[error("{format} extraction is not supported: {reason}")]
    UnsupportedOperation {
        format: &'static str,
        reason: &'static str,
    },

    /// The bytes of a recognized format could not be parsed
    #[error("Failed to extract {format} text: {reason}")]
    ExtractionFailed { format: &'static str, reason: String },

    /// Extracted text exceeds the configured ceiling
    #[error("Content too large: {size} characters exceeds max {max}")]
    ContentTooLarge { size: usize, max: usize },
}

impl ExtractError {
    pub(crate) fn failed(format: &'static str, reason: impl ToString) -> Self {
        ExtractError::ExtractionFailed {
            format,
            reason: reason.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        ExtractError::failed("ZIP", err)
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for ExtractError {
    fn from(err: lopdf::Error) -> Self {
        ExtractError::failed("PDF", err)
    }
}

#[cfg(feature = "spreadsheet")]
impl From<calamine::Error> for ExtractError {
    fn from(err: calamine::Error) -> Self {
        ExtractError::failed("spreadsheet", err)
    }
}
