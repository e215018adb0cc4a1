//! Text decoding with raw-bytes fallback, and text encoding.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

use crate::types::Value;

/// Decodes `bytes` as text, yielding the raw bytes if they are malformed.
pub(crate) fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Value {
    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Value::Text(text.into_owned()),
        None => {
            tracing::warn!(
                "Failed to decode {} bytes as {}, keeping raw bytes",
                bytes.len(),
                encoding.name()
            );
            Value::Bytes(bytes.to_vec())
        }
    }
}

/// Encodes `text`, or `None` if it has unmappable characters.
///
/// encoding_rs only encodes to ASCII-compatible encodings, so UTF-16 is
/// written by hand.
pub(crate) fn encode_text(text: &str, encoding: &'static Encoding) -> Option<Vec<u8>> {
    if encoding == UTF_16LE {
        return Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Some(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        None
    } else {
        Some(bytes.into_owned())
    }
}
