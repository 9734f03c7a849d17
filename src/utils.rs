//! Decoding helpers for string literals and hex byte lists.

use crate::error::{ErrorKind, ParseResult};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::UTF_16LE;
use std::io::Cursor;

/// Decodes a backslash-escaped string literal body.
///
/// Only `\"` and `\\` are valid escapes. Anything else after a backslash,
/// including the end of the text, is an [`ErrorKind::Escape`].
pub fn unescape(text: &str) -> ParseResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                return Err(ErrorKind::Escape(format!("\\{} is not a valid escape", other)))
            }
            None => {
                return Err(ErrorKind::Escape(
                    "backslash at end of string literal".to_string(),
                ))
            }
        }
    }

    Ok(out)
}

/// Decodes a comma-separated list of two-digit hex bytes.
///
/// Whitespace around tokens is ignored and a single trailing comma is
/// tolerated. An empty list decodes to no bytes.
pub fn decode_hex_list(text: &str) -> ParseResult<Vec<u8>> {
    let text = text.trim();
    let body = text.strip_suffix(',').unwrap_or(text);
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(|token| {
            let token = token.trim();
            if token.len() != 2 {
                return Err(ErrorKind::binary(format!(
                    "expected two hex digits, found {:?}",
                    token
                )));
            }
            hex::decode(token)
                .map(|bytes| bytes[0])
                .map_err(|e| ErrorKind::binary(format!("bad hex byte {:?}: {}", token, e)))
        })
        .collect()
}

/// Decodes UTF-16LE bytes without BOM handling, rejecting unpaired surrogates.
fn decode_utf16(data: &[u8]) -> ParseResult<String> {
    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(data);
    if had_errors {
        return Err(ErrorKind::binary("invalid UTF-16 sequence"));
    }
    Ok(decoded.into_owned())
}

/// Checks the byte layout shared by all UTF-16 payloads: even length, and a
/// final 16-bit null.
fn check_utf16_terminated(data: &[u8]) -> ParseResult<()> {
    if data.len() % 2 != 0 {
        return Err(ErrorKind::binary(format!(
            "UTF-16 data has odd length {}",
            data.len()
        )));
    }
    if !data.ends_with(&[0, 0]) {
        return Err(ErrorKind::binary("UTF-16 data is not null-terminated"));
    }
    Ok(())
}

/// Decodes a null-terminated UTF-16LE string, excluding the terminator.
///
/// # Errors
///
/// Returns [`ErrorKind::BinaryParse`] if the length is odd, the data does not
/// end with `00,00`, or the code units are not valid UTF-16.
pub fn decode_utf16_string(data: &[u8]) -> ParseResult<String> {
    check_utf16_terminated(data)?;
    decode_utf16(&data[..data.len() - 2])
}

/// Splits a double-null-terminated UTF-16LE payload into its strings.
///
/// Each embedded `00,00` code unit ends one string. The final code unit is
/// the list terminator and is not scanned.
///
/// Text left over before the terminator without its own null is kept as a
/// last element. A strict reading would only emit a string on reaching its
/// null and drop that tail; keeping it avoids silently losing data.
pub fn decode_utf16_multi(data: &[u8]) -> ParseResult<Vec<String>> {
    check_utf16_terminated(data)?;

    let body = &data[..data.len() - 2];
    let mut strings = Vec::new();
    let mut start = 0;

    for (index, unit) in body.chunks_exact(2).enumerate() {
        if unit == [0, 0] {
            let end = index * 2;
            strings.push(decode_utf16(&body[start..end])?);
            start = end + 2;
        }
    }
    if start < body.len() {
        strings.push(decode_utf16(&body[start..])?);
    }

    Ok(strings)
}

/// Reads a little-endian QWORD from an eight-byte payload.
pub fn decode_qword(data: &[u8]) -> ParseResult<u64> {
    if data.len() != 8 {
        return Err(ErrorKind::binary(format!(
            "QWORD needs 8 bytes, found {}",
            data.len()
        )));
    }
    let mut cursor = Cursor::new(data);
    cursor
        .read_u64::<LittleEndian>()
        .map_err(|e| ErrorKind::binary(e.to_string()))
}

/// Parses the hex digits of a `dword:` value.
pub fn decode_dword(text: &str) -> ParseResult<u32> {
    let digits = text.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ErrorKind::data_type(format!(
            "malformed DWORD {:?}",
            digits
        )));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| ErrorKind::data_type(format!("DWORD {:?} exceeds 32 bits", digits)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b"#).unwrap(), "a\"b");
        assert_eq!(unescape(r"C:\\Windows").unwrap(), r"C:\Windows");
        assert_eq!(unescape("plain").unwrap(), "plain");
    }

    #[test]
    fn test_unescape_rejects_unknown() {
        assert!(matches!(unescape(r"a\nb"), Err(ErrorKind::Escape(_))));
        assert!(matches!(unescape(r"trailing\"), Err(ErrorKind::Escape(_))));
    }

    #[test]
    fn test_decode_hex_list() {
        assert_eq!(decode_hex_list("01,ab,FF").unwrap(), vec![0x01, 0xab, 0xff]);
        assert_eq!(decode_hex_list("01,02,").unwrap(), vec![1, 2]);
        assert_eq!(decode_hex_list("  00, 01  ").unwrap(), vec![0, 1]);
        assert!(decode_hex_list("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_hex_list_malformed() {
        assert!(matches!(decode_hex_list("1,02"), Err(ErrorKind::BinaryParse(_))));
        assert!(matches!(decode_hex_list("zz"), Err(ErrorKind::BinaryParse(_))));
        assert!(matches!(decode_hex_list("01,,02"), Err(ErrorKind::BinaryParse(_))));
        assert!(matches!(decode_hex_list("012"), Err(ErrorKind::BinaryParse(_))));
    }

    #[test]
    fn test_decode_utf16_string() {
        let mut data = utf16("%SystemRoot%");
        data.extend([0, 0]);
        assert_eq!(decode_utf16_string(&data).unwrap(), "%SystemRoot%");
        assert_eq!(decode_utf16_string(&[0, 0]).unwrap(), "");
    }

    #[test]
    fn test_decode_utf16_string_errors() {
        assert!(decode_utf16_string(&[0x41, 0x00]).is_err());
        assert!(decode_utf16_string(&[0x41, 0x00, 0x00]).is_err());
        assert!(decode_utf16_string(&[]).is_err());
    }

    #[test]
    fn test_decode_utf16_multi() {
        let mut data = utf16("one\0two\0");
        data.extend([0, 0]);
        assert_eq!(decode_utf16_multi(&data).unwrap(), vec!["one", "two"]);
        assert!(decode_utf16_multi(&[0, 0]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_utf16_multi_keeps_empty_inner_strings() {
        let mut data = utf16("a\0\0b\0");
        data.extend([0, 0]);
        assert_eq!(decode_utf16_multi(&data).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_decode_utf16_multi_unterminated_tail() {
        let mut data = utf16("one\0two");
        data.extend([0, 0]);
        assert_eq!(decode_utf16_multi(&data).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_decode_qword() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(decode_qword(&data).unwrap(), 0x0807060504030201);
        assert!(decode_qword(&data[..4]).is_err());
    }

    #[test]
    fn test_decode_dword() {
        assert_eq!(decode_dword("0000002a").unwrap(), 42);
        assert_eq!(decode_dword("ffffffff").unwrap(), u32::MAX);
        assert!(matches!(decode_dword("1ffffffff"), Err(ErrorKind::DataType(_))));
        assert!(matches!(decode_dword("+1"), Err(ErrorKind::DataType(_))));
        assert!(matches!(decode_dword(""), Err(ErrorKind::DataType(_))));
    }
}
