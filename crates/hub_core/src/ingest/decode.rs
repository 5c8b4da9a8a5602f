//! Byte-to-text decoding for uploaded files.

use super::{ImportError, DEFAULT_ENCODING};
use encoding_rs::{Encoding, UTF_8};

/// Decodes `bytes` with the declared label, letting a byte-order mark override it.
///
/// Malformed sequences are fatal; nothing is replaced with U+FFFD.
pub fn decode_text(bytes: &[u8], label: Option<&str>) -> Result<String, ImportError> {
    let requested = label
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_ENCODING);
    let declared =
        Encoding::for_label(requested.as_bytes()).ok_or_else(|| ImportError::Encoding {
            line: None,
            detail: format!("unsupported encoding label `{requested}`"),
        })?;

    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((declared, 0));
    let body = &bytes[bom_len..];

    match encoding.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Ok(text.into_owned()),
        None => Err(ImportError::Encoding {
            line: invalid_utf8_line(encoding, body),
            detail: format!("input is not valid {}", encoding.name()),
        }),
    }
}

// Only UTF-8 failures can be pinned to a line cheaply.
fn invalid_utf8_line(encoding: &'static Encoding, body: &[u8]) -> Option<u64> {
    if encoding != UTF_8 {
        return None;
    }
    let valid_up_to = std::str::from_utf8(body).err()?.valid_up_to();
    // CRLF counts once; lone CR and lone LF count once each.
    let breaks = body[..valid_up_to]
        .iter()
        .enumerate()
        .filter(|(index, byte)| match **byte {
            b'\n' => true,
            b'\r' => body.get(index + 1) != Some(&b'\n'),
            _ => false,
        })
        .count();
    Some(breaks as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::decode_text;
    use crate::ingest::ImportErrorKind;

    #[test]
    fn strips_utf8_bom() {
        let text = decode_text(b"\xEF\xBB\xBFid\n1\n", None).expect("decode");
        assert_eq!(text, "id\n1\n");
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let err = decode_text(b"id\n1\n\xFF\n", Some("utf-8")).unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::EncodingError);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn invalid_utf8_line_counts_every_terminator_style() {
        let err = decode_text(b"a\r1\r\xFF\r", None).unwrap_err();
        assert_eq!(err.line(), Some(3));

        let err = decode_text(b"a\r\n1\r\n\xFF\r\n", None).unwrap_err();
        assert_eq!(err.line(), Some(3));

        let err = decode_text(b"a\n1\r2\r\n\xFF", None).unwrap_err();
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn declared_legacy_encoding_is_honored() {
        // 0xE9 is `é` in windows-1252.
        let text = decode_text(b"name\nCaf\xE9\n", Some("windows-1252")).expect("decode");
        assert_eq!(text, "name\nCaf\u{e9}\n");
    }

    #[test]
    fn utf16_bom_overrides_declared_label() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "a\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let text = decode_text(&bytes, Some("utf-8")).expect("decode");
        assert_eq!(text, "a\n");
    }

    #[test]
    fn unknown_label_is_an_encoding_error() {
        let err = decode_text(b"a\n", Some("klingon")).unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::EncodingError);
        assert_eq!(err.line(), None);
    }
}
