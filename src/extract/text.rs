//! Plain-text decoding

use crate::error::Result;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode bytes as strict UTF-8.
///
/// A leading byte-order mark is dropped rather than kept as a U+FEFF
/// character at the start of the text, so BOM-prefixed files read the same
/// as plain ones. Any other invalid sequence is a decode error.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    Ok(String::from_utf8(bytes.to_vec())?)
}
