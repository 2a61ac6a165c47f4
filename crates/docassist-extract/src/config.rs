//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Configuration for text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum extracted text length (in characters)
    pub max_length: usize,

    /// Maximum bytes read from a single archive entry
    pub max_entry_bytes: u64,

    /// Archive entries with these extensions are treated as plain text
    pub text_extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_length: 2_000_000,
            max_entry_bytes: 10 * 1024 * 1024,
            text_extensions: ["txt", "text", "md", "csv", "sql", "log"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl ExtractorConfig {
    /// Create a new config with custom max length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Create a new config with a custom per-entry archive limit
    pub fn with_max_entry_bytes(mut self, max_entry_bytes: u64) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Whether an archive entry name carries a plain-text extension
    pub fn is_text_entry(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !stem.ends_with('/') => self
                .text_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}
