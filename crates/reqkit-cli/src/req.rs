//! CSR assembly command implementation.

use std::fs;
use std::io::Write;

use clap::Args;
use reqkit_pki::x509::{
    AttributeType, AttributeValue, CertificationRequest, DirectoryStringPolicy, KeyAlgorithm,
    PublicKeyInfo, RequestConfig, SignatureAlgorithm, Subject, Version,
};
use reqkit_utils::asn1::Decoder;
use tracing::debug;

#[derive(Args, Debug)]
pub struct ReqArgs {
    /// Subject distinguished name (e.g. /C=DE/O=Example Inc/CN=example.com).
    #[arg(short, long)]
    pub subj: String,
    /// Public key file: a PEM PUBLIC KEY block or raw key bytes.
    #[arg(long)]
    pub pubkey: String,
    /// File holding the externally produced signature bytes.
    #[arg(long)]
    pub signature: String,
    /// Algorithm of raw key bytes (rsa, p256, p384, p521, ed25519).
    #[arg(long, default_value = "rsa")]
    pub key_alg: KeyAlgorithm,
    /// Signature algorithm (sha256-rsa, ecdsa-sha384, ed25519, ...). Default: sha1-rsa.
    #[arg(long)]
    pub alg: Option<SignatureAlgorithm>,
    /// Request version.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub version: Version,
    /// Refuse MD5 and SHA-1 signature algorithms.
    #[arg(long)]
    pub strict: bool,
    /// Encode free-form values as UTF8String even when PrintableString fits.
    #[arg(long)]
    pub utf8: bool,
    /// Include an empty attributes field in the request info.
    #[arg(long)]
    pub attributes: bool,
    /// Write DER instead of PEM.
    #[arg(long)]
    pub der: bool,
    /// Output file.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Parse `/K=V/K=V` subject syntax, keeping the given order.
///
/// String kinds are settled by the request config at build time.
fn parse_subject(subj: &str) -> Result<Subject, Box<dyn std::error::Error>> {
    let mut subject = Subject::default();
    for part in subj.split('/') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("invalid subject part: {part}"))?;
        let attr_type: AttributeType = key.trim().parse()?;
        subject.push_value(AttributeValue::new(attr_type, value)?);
    }
    if subject.is_empty() {
        return Err("empty subject".into());
    }
    Ok(subject)
}

fn read_public_key(
    path: &str,
    algorithm: KeyAlgorithm,
) -> Result<PublicKeyInfo, Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    if let Ok(text) = std::str::from_utf8(&data) {
        if text.contains("-----BEGIN PUBLIC KEY-----") {
            debug!(path, "reading SubjectPublicKeyInfo from PEM");
            let der = reqkit_utils::pem::parse_one(text, "PUBLIC KEY")?;
            return Ok(PublicKeyInfo::parse(&mut Decoder::new(&der))?);
        }
    }
    Ok(PublicKeyInfo::new(algorithm, &data)?)
}

fn build(args: &ReqArgs) -> Result<CertificationRequest, Box<dyn std::error::Error>> {
    let policy = if args.utf8 {
        DirectoryStringPolicy::Utf8Only
    } else {
        DirectoryStringPolicy::PreferPrintable
    };
    let subject = parse_subject(&args.subj)?;
    let public_key = read_public_key(&args.pubkey, args.key_alg)?;
    let signature = fs::read(&args.signature)?;

    let mut config = RequestConfig::builder()
        .directory_string(policy)
        .allow_legacy_algorithms(!args.strict)
        .emit_attributes(args.attributes);
    if let Some(alg) = args.alg {
        config = config.signature_algorithm(alg);
    }

    let csr = CertificationRequest::builder(subject)
        .version(args.version)
        .public_key(public_key)
        .signature(&signature)
        .config(config.build())
        .build()
        .map_err(|e| format!("failed to build CSR: {e}"))?;
    Ok(csr)
}

pub fn run(args: &ReqArgs) -> Result<(), Box<dyn std::error::Error>> {
    let csr = build(args)?;
    let output = if args.der {
        csr.to_der()
    } else {
        csr.to_pem().into_bytes()
    };

    if let Some(out_path) = &args.output {
        fs::write(out_path, &output)?;
        eprintln!("CSR written to {out_path} ({} DER bytes)", csr.der_len());
    } else {
        let mut stdout = std::io::stdout();
        stdout.write_all(&output)?;
        if !args.der {
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
