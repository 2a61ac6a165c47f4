//! Content-type to document-format resolution

/// MIME type for Word documents
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for modern Excel workbooks
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// MIME type for legacy Excel workbooks
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// Formats the extractor knows about, whether or not it can read them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// text/plain, text/csv, application/sql
    PlainText,
    Pdf,
    Docx,
    Spreadsheet,
    Zip,
    Rar,
    Image,
    Audio,
    Video,
}

impl DocumentFormat {
    /// Map a declared content type to a format.
    ///
    /// Parameters after `;` are ignored and matching is case-insensitive.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = essence(content_type);
        let format = match essence.as_str() {
            "text/plain" | "text/csv" | "application/sql" => DocumentFormat::PlainText,
            "application/pdf" => DocumentFormat::Pdf,
            DOCX_MIME => DocumentFormat::Docx,
            XLS_MIME | XLSX_MIME => DocumentFormat::Spreadsheet,
            "application/zip" | "application/x-zip-compressed" => DocumentFormat::Zip,
            "application/x-rar" | "application/x-rar-compressed" | "application/vnd.rar" => {
                DocumentFormat::Rar
            }
            other if other.starts_with("image/") => DocumentFormat::Image,
            other if other.starts_with("audio/") => DocumentFormat::Audio,
            other if other.starts_with("video/") => DocumentFormat::Video,
            _ => return None,
        };
        Some(format)
    }

    /// Resolve the format of an upload, guessing from the filename when the
    /// declared type is missing or generic.
    pub fn resolve(content_type: &str, filename: &str) -> Option<Self> {
        Self::from_content_type(&effective_content_type(content_type, filename))
    }

    /// Human-readable label used in errors and logs
    pub fn label(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "text",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Spreadsheet => "spreadsheet",
            DocumentFormat::Zip => "ZIP",
            DocumentFormat::Rar => "RAR",
            DocumentFormat::Image => "image",
            DocumentFormat::Audio => "audio",
            DocumentFormat::Video => "video",
        }
    }
}

/// The content type an upload should be treated as.
///
/// Browsers send `application/octet-stream` (or nothing) for files they do
/// not recognize; in that case the filename extension decides.
pub fn effective_content_type(content_type: &str, filename: &str) -> String {
    let declared = essence(content_type);
    if !declared.is_empty() && declared != "application/octet-stream" {
        return declared;
    }
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_ascii_lowercase())
        .unwrap_or(declared)
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(
            DocumentFormat::from_content_type("text/plain; charset=utf-8"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(
            DocumentFormat::from_content_type("Application/PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_content_type(XLS_MIME),
            Some(DocumentFormat::Spreadsheet)
        );
        assert_eq!(
            DocumentFormat::from_content_type("image/png"),
            Some(DocumentFormat::Image)
        );
        assert_eq!(DocumentFormat::from_content_type("application/json"), None);
    }

    #[test]
    fn test_octet_stream_guesses_from_filename() {
        assert_eq!(
            effective_content_type("application/octet-stream", "report.pdf"),
            "application/pdf"
        );
        assert_eq!(
            DocumentFormat::resolve("", "notes.txt"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(effective_content_type("text/csv", "data.pdf"), "text/csv");
    }
}
