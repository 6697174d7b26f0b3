//! Base32 text encoding for key files and envelopes.
//!
//! Every file Seal writes is one base32 value followed by a newline. The
//! alphabet is lowercase, skips the easily confused `i`, `l`, `o` and `u`,
//! and carries no padding. Line breaks inside a value are skipped on decode,
//! so wrapped files still read.

use data_encoding::{Encoding, Specification};
use once_cell::sync::Lazy;

use crate::error::{Result, SealError};

/// Symbols of the base32 alphabet, in value order.
pub const ALPHABET: &str = "0123456789abcdefghjkmnpqrstvwxyz";

static BASE32: Lazy<Encoding> = Lazy::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(ALPHABET);
    spec.check_trailing_bits = false;
    spec.ignore.push_str("\r\n");
    spec.encoding()
        .expect("static base32 specification is valid")
});

/// Encode bytes without a trailing newline.
pub fn encode(data: &[u8]) -> String {
    BASE32.encode(data)
}

/// Encode bytes as the contents of a file: base32 plus a trailing newline.
pub fn encode_line(data: &[u8]) -> String {
    let mut text = encode(data);
    text.push('\n');
    text
}

/// Decode base32 text, ignoring surrounding whitespace and line breaks.
pub fn decode(text: &[u8]) -> Result<Vec<u8>> {
    let trimmed = text.trim_ascii();
    BASE32
        .decode(trimmed)
        .map_err(|e| SealError::Encoding(e.to_string()))
}
