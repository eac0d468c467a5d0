//! Input Encoding Detection
//!
//! Picks the decoder for a byte stream from its first block:
//! byte order mark, BOM-less UTF-16 patterns, or the `encoding` label of a
//! leading `<?xml ...?>` declaration. Falls back to UTF-8.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use memchr::{memchr, memchr2, memmem};

/// Detect the encoding of markup input from its leading bytes
pub fn detect(input: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(input) {
        return encoding;
    }

    if input.len() >= 2 {
        match (input[0], input[1]) {
            // No BOM - '<' paired with a null byte is UTF-16
            (0x00, b'<') => return UTF_16BE,
            (b'<', 0x00) => return UTF_16LE,
            _ => {}
        }
    }

    declared_encoding(input).unwrap_or(UTF_8)
}

/// Read the `encoding="..."` label out of a leading declaration
fn declared_encoding(input: &[u8]) -> Option<&'static Encoding> {
    if !input.starts_with(b"<?xml") {
        return None;
    }
    let end = memchr(b'>', input)?;
    let decl = &input[..end];

    let attr = memmem::find(decl, b"encoding")?;
    let rest = &decl[attr + b"encoding".len()..];
    let quote = memchr2(b'"', b'\'', rest)?;
    let delimiter = rest[quote];
    let value = &rest[quote + 1..];
    let close = memchr(delimiter, value)?;

    // UTF-16 labels cannot describe an ASCII-compatible declaration
    match Encoding::for_label(&value[..close]) {
        Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => None,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn test_detect_utf8() {
        assert_eq!(detect(b"<root/>"), UTF_8);
        assert_eq!(detect(b"<?xml"), UTF_8);
        assert_eq!(detect(b""), UTF_8);
    }

    #[test]
    fn test_detect_utf8_bom() {
        assert_eq!(detect(&[0xEF, 0xBB, 0xBF, b'<']), UTF_8);
    }

    #[test]
    fn test_detect_utf16_le_bom() {
        assert_eq!(detect(&[0xFF, 0xFE, b'<', 0x00]), UTF_16LE);
    }

    #[test]
    fn test_detect_utf16_be_bom() {
        assert_eq!(detect(&[0xFE, 0xFF, 0x00, b'<']), UTF_16BE);
    }

    #[test]
    fn test_detect_utf16_without_bom() {
        assert_eq!(detect(&[b'<', 0x00, b'r', 0x00]), UTF_16LE);
        assert_eq!(detect(&[0x00, b'<', 0x00, b'r']), UTF_16BE);
    }

    #[test]
    fn test_detect_declared_label() {
        let input = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\" ?><r/>";
        assert_eq!(detect(input), WINDOWS_1252);

        let single = b"<?xml version='1.0' encoding='utf-8'?><r/>";
        assert_eq!(detect(single), UTF_8);
    }

    #[test]
    fn test_detect_unknown_label_falls_back() {
        let input = b"<?xml version=\"1.0\" encoding=\"no-such-charset\"?><r/>";
        assert_eq!(detect(input), UTF_8);
    }
}
