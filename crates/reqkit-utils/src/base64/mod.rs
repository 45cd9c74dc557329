//! Base64 encoding and decoding (RFC 4648 standard alphabet, padded).

use ::base64::engine::general_purpose::STANDARD;
use ::base64::Engine as _;
use reqkit_types::DerError;

/// Encode bytes to a Base64 string.
pub fn encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decode a Base64 string to bytes. ASCII whitespace is ignored.
pub fn decode(input: &str) -> Result<Vec<u8>, DerError> {
    let filtered: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(filtered)
        .map_err(|_| DerError::InvalidBase64)
}
