//! ZIP archive extraction: plain-text entries only

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::text::decode_lossy;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Concatenate the decoded text entries of a ZIP archive, in archive order.
///
/// Entries without a plain-text extension are skipped silently.
pub fn extract_zip(bytes: &[u8], config: &ExtractorConfig) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut text = String::new();
    let mut used = 0usize;
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() || !config.is_text_entry(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut contents = Vec::new();
        entry
            .take(config.max_entry_bytes)
            .read_to_end(&mut contents)
            .map_err(|e| ExtractError::failed("ZIP", format!("{}: {}", name, e)))?;

        text.push_str(&decode_lossy(&contents));
        text.push('\n');
        used += 1;
    }

    debug!(entries = archive.len(), text_entries = used, "Extracted ZIP text");
    Ok(text)
}
