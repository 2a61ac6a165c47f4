//! # DocAssist Extract
//!
//! Turns uploaded file bytes into plain text ready for the improvement
//! pipeline.
//!
//! Extraction is a pure function of `(bytes, content type)`: nothing is
//! written to disk and no state is kept between calls. The filename is only
//! consulted when the declared content type is generic.
//!
//! ## Example
//!
//! ```rust
//! use docassist_extract::TextExtractor;
//!
//! let extractor = TextExtractor::default();
//! let text = extractor
//!     .extract(b"  Hello, world!\n", "text/plain", "hello.txt")
//!     .unwrap();
//! assert_eq!(text, "Hello, world!");
//! ```
//!
//! ## Supported formats
//!
//! ```text
//! text/plain, text/csv, application/sql  -> lossy UTF-8 decode
//! application/pdf                        -> page text, in order   (feature "pdf")
//! DOCX                                   -> paragraphs, newline-joined
//! XLS / XLSX                             -> first sheet as a table (feature "spreadsheet")
//! application/zip                        -> text entries, newline-joined
//! RAR, image/*, audio/*, video/*         -> UnsupportedOperation
//! ```

pub mod archive;
pub mod config;
pub mod docx;
pub mod error;
pub mod format;
pub mod text;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "spreadsheet")]
pub mod spreadsheet;

pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use format::{effective_content_type, DocumentFormat};

use tracing::{debug, warn};

/// Stateless text extractor
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create a new extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract trimmed plain text from `content`.
    ///
    /// Fails with [`ExtractError::UnsupportedFormat`] for unknown content
    /// types, [`ExtractError::UnsupportedOperation`] for known formats that
    /// cannot be read, and [`ExtractError::ExtractionFailed`] when the bytes
    /// of a readable format are corrupt.
    pub fn extract(&self, content: &[u8], content_type: &str, filename: &str) -> Result<String> {
        let Some(format) = DocumentFormat::resolve(content_type, filename) else {
            warn!(filename, content_type, "No extractor for content type");
            return Err(ExtractError::UnsupportedFormat(content_type.to_string()));
        };

        let raw = self.extract_raw(format, content).map_err(|e| {
            warn!(filename, format = format.label(), error = %e, "Text extraction failed");
            e
        })?;

        let text = raw.trim();
        let size = text.chars().count();
        if size > self.config.max_length {
            return Err(ExtractError::ContentTooLarge {
                size,
                max: self.config.max_length,
            });
        }

        debug!(filename, format = format.label(), chars = size, "Extracted text");
        Ok(text.to_string())
    }

    fn extract_raw(&self, format: DocumentFormat, content: &[u8]) -> Result<String> {
        match format {
            DocumentFormat::PlainText => Ok(text::decode_lossy(content)),
            DocumentFormat::Pdf => extract_pdf(content),
            DocumentFormat::Docx => docx::extract_docx(content),
            DocumentFormat::Spreadsheet => extract_spreadsheet(content),
            DocumentFormat::Zip => archive::extract_zip(content, &self.config),
            DocumentFormat::Rar => Err(ExtractError::UnsupportedOperation {
                format: "RAR",
                reason: "no RAR decoder is available",
            }),
            DocumentFormat::Image => Err(ExtractError::UnsupportedOperation {
                format: "image",
                reason: "OCR is not supported by the current models",
            }),
            DocumentFormat::Audio | DocumentFormat::Video => {
                Err(ExtractError::UnsupportedOperation {
                    format: format.label(),
                    reason: "transcription is not supported by the current models",
                })
            }
        }
    }
}

/// Extract text with the default configuration
pub fn extract(content: &[u8], content_type: &str, filename: &str) -> Result<String> {
    TextExtractor::default().extract(content, content_type, filename)
}

#[cfg(feature = "pdf")]
fn extract_pdf(content: &[u8]) -> Result<String> {
    pdf::extract_pdf(content)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_content: &[u8]) -> Result<String> {
    Err(ExtractError::UnsupportedOperation {
        format: "PDF",
        reason: "built without the 'pdf' feature",
    })
}

#[cfg(feature = "spreadsheet")]
fn extract_spreadsheet(content: &[u8]) -> Result<String> {
    spreadsheet::extract_spreadsheet(content)
}

#[cfg(not(feature = "spreadsheet"))]
fn extract_spreadsheet(_content: &[u8]) -> Result<String> {
    Err(ExtractError::UnsupportedOperation {
        format: "spreadsheet",
        reason: "built without the 'spreadsheet' feature",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
            body
        );
        build_zip(&[("word/document.xml", xml.as_str())])
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract(b"\n  This is a test.  \n\n", "text/plain", "test.txt").unwrap();
        assert_eq!(text, "This is a test.");
    }

    #[test]
    fn test_csv_and_sql_decode_as_text() {
        assert_eq!(
            extract(b"a,b\n1,2\n", "text/csv", "data.csv").unwrap(),
            "a,b\n1,2"
        );
        assert_eq!(
            extract(b"SELECT 1;\n", "application/sql", "q.sql").unwrap(),
            "SELECT 1;"
        );
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let text = extract(b"ok \xC3\x28 still ok", "text/plain", "bad.txt").unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with("still ok"));
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = build_docx(&["This is a test.", "Second paragraph. "]);
        let text = extract(&bytes, format::DOCX_MIME, "test.docx").unwrap();
        assert_eq!(text, "This is a test.\nSecond paragraph.");
    }

    #[test]
    fn test_zip_text_entries_only() {
        let bytes = build_zip(&[
            ("readme.txt", "  hello  "),
            ("photo.jpg", "binary"),
            ("notes/todo.txt", "world"),
        ]);
        let text = extract(&bytes, "application/zip", "bundle.zip").unwrap();
        assert_eq!(text, "hello  \nworld");
    }

    #[test]
    fn test_zip_without_text_entries_is_empty() {
        let bytes = build_zip(&[("photo.jpg", "binary"), ("song.mp3", "more binary")]);
        let text = extract(&bytes, "application/zip", "media.zip").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_unsupported_format() {
        let err = extract(b"{}", "application/json", "data.json").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ct) if ct == "application/json"));
    }

    #[test]
    fn test_recognized_but_unsupported() {
        for content_type in ["application/x-rar", "image/png", "audio/mpeg", "video/mp4"] {
            let err = extract(b"\x00\x01", content_type, "file.bin").unwrap_err();
            assert!(
                matches!(err, ExtractError::UnsupportedOperation { .. }),
                "{} should be UnsupportedOperation, got {:?}",
                content_type,
                err
            );
        }
    }

    #[test]
    fn test_corrupt_docx_is_extraction_failure() {
        let err = extract(b"garbage", format::DOCX_MIME, "broken.docx").unwrap_err();
        assert!(matches!(err, ExtractError::ExtractionFailed { .. }));
    }

    #[test]
    fn test_octet_stream_uses_filename() {
        let text = extract(b" guessed ", "application/octet-stream", "notes.txt").unwrap();
        assert_eq!(text, "guessed");
    }

    #[test]
    fn test_max_length() {
        let extractor = TextExtractor::new(ExtractorConfig::default().with_max_length(5));
        let err = extractor
            .extract(b"far too long", "text/plain", "long.txt")
            .unwrap_err();
        assert!(matches!(err, ExtractError::ContentTooLarge { size: 12, max: 5 }));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let bytes = build_docx(&["Same input", "same output"]);
        let first = extract(&bytes, format::DOCX_MIME, "a.docx").unwrap();
        let second = extract(&bytes, format::DOCX_MIME, "a.docx").unwrap();
        assert_eq!(first, second);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_pages_in_order() {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in ["Hello", "World"] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let text = extract(&bytes, "application/pdf", "two-pages.pdf").unwrap();
        let hello = text.find("Hello").expect("first page text");
        let world = text.find("World").expect("second page text");
        assert!(hello < world);
        assert_eq!(text, text.trim());
    }
}
