//! Plain text decoding

/// Decode bytes as UTF-8, replacing invalid sequences with U+FFFD.
///
/// A leading byte-order mark is dropped.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8() {
        assert_eq!(decode_lossy("héllo wörld".as_bytes()), "héllo wörld");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let decoded = decode_lossy(b"abc\xFF\xFEdef");
        assert!(decoded.starts_with("abc"));
        assert!(decoded.ends_with("def"));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_bom_is_stripped() {
        assert_eq!(decode_lossy(b"\xEF\xBB\xBFSELECT 1;"), "SELECT 1;");
    }
}
