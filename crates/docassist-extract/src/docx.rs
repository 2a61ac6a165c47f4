//! Word (DOCX) paragraph extraction
//!
//! A DOCX file is a ZIP package; the body lives in `word/document.xml` as
//! WordprocessingML. Paragraphs are `<w:p>` elements and visible text sits
//! in `<w:t>` runs.

use crate::error::{ExtractError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

static BODY_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<empty><w:p(?:\s[^>]*)?/>)|(?P<open><w:p(?:\s[^>]*)?>)|<w:t(?:\s[^>]*)?>(?P<text>[^<]*)</w:t>|(?P<tab><w:tab/>)|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)",
    )
    .expect("DOCX token pattern is valid")
});

/// Extract paragraph texts joined by newlines, in document order
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::failed("DOCX", e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::failed("DOCX", format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::failed("DOCX", e))?;

    Ok(paragraphs(&xml).join("\n"))
}

/// Split WordprocessingML into paragraph strings
fn paragraphs(xml: &str) -> Vec<String> {
    let mut paragraphs: Vec<String> = Vec::new();

    for caps in BODY_TOKENS.captures_iter(xml) {
        if caps.name("empty").is_some() || caps.name("open").is_some() {
            paragraphs.push(String::new());
            continue;
        }

        if paragraphs.is_empty() {
            paragraphs.push(String::new());
        }
        let Some(current) = paragraphs.last_mut() else {
            continue;
        };

        if let Some(text) = caps.name("text") {
            current.push_str(&unescape_xml(text.as_str()));
        } else if caps.name("tab").is_some() {
            current.push('\t');
        } else if caps.name("br").is_some() {
            current.push('\n');
        }
    }

    paragraphs
}

/// Resolve the predefined XML entities and numeric character references
fn unescape_xml(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_in_order() {
        let xml = r#"<w:document><w:body>
            <w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>First</w:t></w:r></w:p>
            <w:p w:rsidR="00AB"><w:r><w:t xml:space="preserve">Second </w:t></w:r><w:r><w:t>line</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>Col</w:t><w:tab/><w:t>B</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(paragraphs(xml), vec!["First", "Second line", "", "Col\tB"]);
    }

    #[test]
    fn test_table_markup_is_not_text() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(paragraphs(xml), vec!["cell"]);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_xml("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape_xml("&#65;&#x42;"), "AB");
        assert_eq!(unescape_xml("AT&T; & co"), "AT&T; & co");
    }

    #[test]
    fn test_missing_document_part() {
        let err = extract_docx(b"PK not really").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ExtractionFailed { format: "DOCX", .. }
        ));
    }
}
