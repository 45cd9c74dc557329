use std::fmt;
use std::str::FromStr;

use crate::CsrError;

/// Signature algorithm identifiers accepted in a certificate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureAlgorithm {
    Md5WithRsa,
    /// Compatibility default. Legacy: emits a warning whenever used.
    #[default]
    Sha1WithRsa,
    Sha224WithRsa,
    Sha256WithRsa,
    Sha384WithRsa,
    Sha512WithRsa,
    EcdsaWithSha256,
    EcdsaWithSha384,
    EcdsaWithSha512,
    Ed25519,
}

impl SignatureAlgorithm {
    /// All known signature algorithms, in table order.
    pub const ALL: [SignatureAlgorithm; 10] = [
        SignatureAlgorithm::Md5WithRsa,
        SignatureAlgorithm::Sha1WithRsa,
        SignatureAlgorithm::Sha224WithRsa,
        SignatureAlgorithm::Sha256WithRsa,
        SignatureAlgorithm::Sha384WithRsa,
        SignatureAlgorithm::Sha512WithRsa,
        SignatureAlgorithm::EcdsaWithSha256,
        SignatureAlgorithm::EcdsaWithSha384,
        SignatureAlgorithm::EcdsaWithSha512,
        SignatureAlgorithm::Ed25519,
    ];

    /// The ASN.1 name of the algorithm (e.g. `sha256WithRSAEncryption`).
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Md5WithRsa => "md5WithRSAEncryption",
            SignatureAlgorithm::Sha1WithRsa => "sha1WithRSAEncryption",
            SignatureAlgorithm::Sha224WithRsa => "sha224WithRSAEncryption",
            SignatureAlgorithm::Sha256WithRsa => "sha256WithRSAEncryption",
            SignatureAlgorithm::Sha384WithRsa => "sha384WithRSAEncryption",
            SignatureAlgorithm::Sha512WithRsa => "sha512WithRSAEncryption",
            SignatureAlgorithm::EcdsaWithSha256 => "ecdsa-with-SHA256",
            SignatureAlgorithm::EcdsaWithSha384 => "ecdsa-with-SHA384",
            SignatureAlgorithm::EcdsaWithSha512 => "ecdsa-with-SHA512",
            SignatureAlgorithm::Ed25519 => "Ed25519",
        }
    }

    /// Short command-line name (e.g. `sha256-rsa`).
    pub fn short_name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Md5WithRsa => "md5-rsa",
            SignatureAlgorithm::Sha1WithRsa => "sha1-rsa",
            SignatureAlgorithm::Sha224WithRsa => "sha224-rsa",
            SignatureAlgorithm::Sha256WithRsa => "sha256-rsa",
            SignatureAlgorithm::Sha384WithRsa => "sha384-rsa",
            SignatureAlgorithm::Sha512WithRsa => "sha512-rsa",
            SignatureAlgorithm::EcdsaWithSha256 => "ecdsa-sha256",
            SignatureAlgorithm::EcdsaWithSha384 => "ecdsa-sha384",
            SignatureAlgorithm::EcdsaWithSha512 => "ecdsa-sha512",
            SignatureAlgorithm::Ed25519 => "ed25519",
        }
    }

    /// MD5 and SHA-1 based signatures are broken for collision resistance.
    pub fn is_legacy(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::Md5WithRsa | SignatureAlgorithm::Sha1WithRsa
        )
    }

    /// RSA PKCS#1 v1.5 identifiers carry an explicit NULL parameter.
    pub fn has_null_params(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::Md5WithRsa
                | SignatureAlgorithm::Sha1WithRsa
                | SignatureAlgorithm::Sha224WithRsa
                | SignatureAlgorithm::Sha256WithRsa
                | SignatureAlgorithm::Sha384WithRsa
                | SignatureAlgorithm::Sha512WithRsa
        )
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CsrError;

    /// Accepts either the short name or the ASN.1 name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| {
                alg.short_name().eq_ignore_ascii_case(s) || alg.name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| CsrError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Named elliptic curves usable as id-ecPublicKey parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    P256,
    P384,
    P521,
}

/// Public key algorithms for SubjectPublicKeyInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyAlgorithm {
    /// rsaEncryption with NULL parameters.
    #[default]
    Rsa,
    /// id-ecPublicKey with a named curve parameter.
    Ec(NamedCurve),
    /// Ed25519, parameters absent.
    Ed25519,
}

impl FromStr for KeyAlgorithm {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rsa" => Ok(KeyAlgorithm::Rsa),
            "p256" | "p-256" | "prime256v1" => Ok(KeyAlgorithm::Ec(NamedCurve::P256)),
            "p384" | "p-384" | "secp384r1" => Ok(KeyAlgorithm::Ec(NamedCurve::P384)),
            "p521" | "p-521" | "secp521r1" => Ok(KeyAlgorithm::Ec(NamedCurve::P521)),
            "ed25519" => Ok(KeyAlgorithm::Ed25519),
            _ => Err(CsrError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}
