//! Single-byte string encoding.
//!
//! Save files store keys and most strings as raw bytes in the Windows code
//! page of the machine that wrote them. Mapping every byte to the code point
//! of the same value keeps the text lossless, so an unmodified string always
//! encodes back to the bytes it was read from.

use crate::{Error, Result};

/// Decode bytes into a string, one char per byte.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode a string back into bytes, one byte per char.
///
/// Fails on the first char above `U+00FF`.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| Error::NotLatin1(c)))
        .collect()
}

/// Check whether bytes look like human-readable text.
///
/// Tabs and printable ASCII are accepted, as is the upper half of the code
/// page (accented letters). Empty input is not text.
pub fn is_text(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|&b| b == b'\t' || (0x20..0x7F).contains(&b) || b >= 0xA0)
}
