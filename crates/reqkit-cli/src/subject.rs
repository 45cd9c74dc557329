//! Subject display command implementation.

use std::fmt::Write as _;
use std::fs;

use reqkit_pki::x509::{subject_offset, Subject, PEM_LABEL};

/// Load the DER bytes and the Name offset to read from.
///
/// Without an explicit offset the input must be a request (PEM or DER).
fn locate(
    data: Vec<u8>,
    offset: Option<usize>,
) -> Result<(Vec<u8>, usize), Box<dyn std::error::Error>> {
    if let Some(offset) = offset {
        return Ok((data, offset));
    }
    let der = match std::str::from_utf8(&data) {
        Ok(text) if text.contains("-----BEGIN") => {
            reqkit_utils::pem::parse_one(text, PEM_LABEL)?
        }
        _ => data,
    };
    let offset = subject_offset(&der)?;
    Ok((der, offset))
}

fn render(data: Vec<u8>, offset: Option<usize>) -> Result<String, Box<dyn std::error::Error>> {
    let (der, start) = locate(data, offset)?;
    let (subject, end) = Subject::from_der_at(&der, start)?;

    let mut out = String::new();
    writeln!(out, "subject={subject}")?;
    for attr in &subject {
        writeln!(
            out,
            "    {} ({}) {}: {}",
            attr.attr_type(),
            attr.attr_type().oid(),
            attr.kind().name(),
            attr.value()
        )?;
    }
    write!(out, "bytes {start}..{end}")?;
    Ok(out)
}

pub fn run(input: &str, offset: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input).map_err(|e| format!("cannot read {input}: {e}"))?;
    println!("{}", render(data, offset)?);
    Ok(())
}
