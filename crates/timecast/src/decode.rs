//! Best-effort decoding of byte sequences into text.
//!
//! Bytes of unknown provenance are decoded by trial and error: the platform
//! default (UTF-8) first, then each encoding of a fixed, ordered list. The
//! first encoding that accepts the whole sequence wins.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimecastError};

/// A text encoding the decoder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1. Every byte maps to a code point, so this never fails.
    Latin1,
    /// UTF-16, little-endian unless a byte-order mark says otherwise.
    Utf16,
    /// UTF-32, little-endian unless a byte-order mark says otherwise.
    Utf32,
}

impl Encoding {
    /// Decode `bytes` with this encoding, or `None` if they are not valid in it.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Utf16 => decode_utf16(bytes),
            Encoding::Utf32 => decode_utf32(bytes),
        }
    }
}

/// Options for [`decode_bytes_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Encodings tried, in order, after UTF-8 fails. UTF-8 is always tried
    /// first and need not be listed.
    pub encodings: Vec<Encoding>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            encodings: vec![Encoding::Latin1, Encoding::Utf16, Encoding::Utf32],
        }
    }
}

/// Decode bytes to text using the default encoding list.
///
/// # Errors
///
/// Returns [`TimecastError::Decode`] if no encoding accepts the bytes.
pub fn decode_bytes(bytes: &[u8]) -> Result<String> {
    decode_bytes_with(bytes, &DecodeOptions::default())
}

/// Decode bytes to text, trying UTF-8 and then each of `options.encodings`.
///
/// # Errors
///
/// Returns [`TimecastError::Decode`] if no encoding accepts the bytes.
pub fn decode_bytes_with(bytes: &[u8], options: &DecodeOptions) -> Result<String> {
    std::iter::once(Encoding::Utf8)
        .chain(options.encodings.iter().copied())
        .find_map(|encoding| {
            let text = encoding.decode(bytes)?;
            tracing::trace!(?encoding, "decoded {} bytes", bytes.len());
            Some(text)
        })
        .ok_or_else(|| {
            TimecastError::Decode(format!(
                "no encoding accepted {} bytes: {:?}",
                bytes.len(),
                bytes
            ))
        })
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let (big_endian, body) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };
    let units = body.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });
    char::decode_utf16(units).collect::<std::result::Result<String, _>>().ok()
}

fn decode_utf32(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    let (big_endian, body) = match bytes {
        [0x00, 0x00, 0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, 0x00, 0x00, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };
    body.chunks_exact(4)
        .map(|quad| {
            let quad = [quad[0], quad[1], quad[2], quad[3]];
            let code = if big_endian {
                u32::from_be_bytes(quad)
            } else {
                u32::from_le_bytes(quad)
            };
            char::from_u32(code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_first() {
        assert_eq!(decode_bytes("2013-06-10".as_bytes()).unwrap(), "2013-06-10");
        assert_eq!(decode_bytes("þórður".as_bytes()).unwrap(), "þórður");
    }

    #[test]
    fn test_decode_default_list_skips_utf8() {
        assert_eq!(
            DecodeOptions::default().encodings,
            vec![Encoding::Latin1, Encoding::Utf16, Encoding::Utf32]
        );
        let options = DecodeOptions { encodings: vec![] };
        assert_eq!(decode_bytes_with("12:30".as_bytes(), &options).unwrap(), "12:30");
        assert!(decode_bytes_with(&[0xFE], &options).is_err());
    }

    #[test]
    fn test_decode_falls_back_to_latin1() {
        // "þ" in ISO-8859-1, invalid as UTF-8
        assert_eq!(decode_bytes(&[0xFE, b'a']).unwrap(), "þa");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let options = DecodeOptions {
            encodings: vec![Encoding::Utf16],
        };
        let bytes = [0xFF, 0xFE, b'1', 0x00, b'2', 0x00];
        assert_eq!(decode_bytes_with(&bytes, &options).unwrap(), "12");

        let bytes = [0xFE, 0xFF, 0x00, b'1', 0x00, b'2'];
        assert_eq!(decode_bytes_with(&bytes, &options).unwrap(), "12");
    }

    #[test]
    fn test_decode_utf32() {
        let options = DecodeOptions {
            encodings: vec![Encoding::Utf32],
        };
        let bytes = [0xFF, 0xFE, 0x00, 0x00, b'7', 0x00, 0x00, 0xFF];
        // 0xFF000037 is not a valid code point
        assert!(decode_bytes_with(&bytes, &options).is_err());

        let bytes = [0xFF, 0xFE, 0x00, 0x00, b'7', 0x00, 0x00, 0x00];
        assert_eq!(decode_bytes_with(&bytes, &options).unwrap(), "7");
    }

    #[test]
    fn test_decode_fails_without_lenient_encoding() {
        let options = DecodeOptions {
            encodings: vec![Encoding::Utf16],
        };
        let err = decode_bytes_with(&[0xFF, 0xFE, 0x00], &options).unwrap_err();
        assert!(matches!(err, TimecastError::Decode(_)));
        assert!(err.to_string().contains("Decode error"));
    }

    #[test]
    fn test_decode_options_from_json() {
        let options: DecodeOptions =
            serde_json::from_str(r#"{"encodings": ["utf16", "latin1"]}"#).unwrap();
        assert_eq!(options.encodings, vec![Encoding::Utf16, Encoding::Latin1]);

        let options: DecodeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DecodeOptions::default());
    }
}
