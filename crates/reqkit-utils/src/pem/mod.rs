//! PEM format parsing and generation (RFC 7468 textual encoding).

use reqkit_types::DerError;

/// A parsed PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// The label (e.g., "CERTIFICATE REQUEST").
    pub label: String,
    /// The decoded binary data.
    pub data: Vec<u8>,
}

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const DASHES_SUFFIX: &str = "-----";

/// Base64 characters per body line.
pub const LINE_WIDTH: usize = 64;

/// Parse a PEM-encoded string into one or more PEM blocks.
///
/// Text outside `BEGIN`/`END` boundaries is ignored. A `BEGIN` line with
/// no matching `END` line is an error.
pub fn parse(input: &str) -> Result<Vec<PemBlock>, DerError> {
    let mut blocks = Vec::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if let Some(label) = line
            .strip_prefix(BEGIN_PREFIX)
            .and_then(|s| s.strip_suffix(DASHES_SUFFIX))
        {
            let label = label.to_string();
            let end_marker = format!("{END_PREFIX}{label}{DASHES_SUFFIX}");

            let mut body = String::new();
            let mut found_end = false;
            for inner_line in lines.by_ref() {
                let inner_line = inner_line.trim();
                if inner_line == end_marker {
                    found_end = true;
                    break;
                }
                body.push_str(inner_line);
            }

            if !found_end {
                return Err(DerError::InvalidPem(format!("missing END line for {label}")));
            }

            let data = crate::base64::decode(&body)?;
            blocks.push(PemBlock { label, data });
        }
    }

    Ok(blocks)
}

/// Parse the first block carrying `label`.
pub fn parse_one(input: &str, label: &str) -> Result<Vec<u8>, DerError> {
    parse(input)?
        .into_iter()
        .find(|block| block.label == label)
        .map(|block| block.data)
        .ok_or_else(|| DerError::InvalidPem(format!("no {label} block found")))
}

/// Encode binary data as a PEM string with the given label.
///
/// The body is wrapped at [`LINE_WIDTH`] characters. The output ends right
/// after the closing boundary, with no trailing newline.
pub fn encode(label: &str, data: &[u8]) -> String {
    let base64 = crate::base64::encode(data);
    // Base64 output is ASCII, so splitting on byte boundaries is safe
    let body: Vec<&str> = base64
        .as_bytes()
        .chunks(LINE_WIDTH)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    format!(
        "{BEGIN_PREFIX}{label}{DASHES_SUFFIX}\n{}\n{END_PREFIX}{label}{DASHES_SUFFIX}",
        body.join("\n")
    )
}
