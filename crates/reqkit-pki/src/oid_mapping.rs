//! Shared OID-to-algorithm mapping helpers for the PKI crate.

use reqkit_types::{KeyAlgorithm, NamedCurve, SignatureAlgorithm};
use reqkit_utils::oid::{known, Oid};

/// OID of a signature algorithm identifier.
pub(crate) fn signature_oid(alg: SignatureAlgorithm) -> Oid {
    match alg {
        SignatureAlgorithm::Md5WithRsa => known::md5_with_rsa_encryption(),
        SignatureAlgorithm::Sha1WithRsa => known::sha1_with_rsa_encryption(),
        SignatureAlgorithm::Sha224WithRsa => known::sha224_with_rsa_encryption(),
        SignatureAlgorithm::Sha256WithRsa => known::sha256_with_rsa_encryption(),
        SignatureAlgorithm::Sha384WithRsa => known::sha384_with_rsa_encryption(),
        SignatureAlgorithm::Sha512WithRsa => known::sha512_with_rsa_encryption(),
        SignatureAlgorithm::EcdsaWithSha256 => known::ecdsa_with_sha256(),
        SignatureAlgorithm::EcdsaWithSha384 => known::ecdsa_with_sha384(),
        SignatureAlgorithm::EcdsaWithSha512 => known::ecdsa_with_sha512(),
        SignatureAlgorithm::Ed25519 => known::ed25519(),
    }
}

/// Map a signature algorithm OID back to its enum value.
///
/// Returns `None` for unrecognized OIDs; callers wrap in their own error.
pub(crate) fn oid_to_signature_algorithm(oid: &Oid) -> Option<SignatureAlgorithm> {
    SignatureAlgorithm::ALL
        .iter()
        .copied()
        .find(|alg| signature_oid(*alg) == *oid)
}

pub(crate) fn curve_oid(curve: NamedCurve) -> Oid {
    match curve {
        NamedCurve::P256 => known::prime256v1(),
        NamedCurve::P384 => known::secp384r1(),
        NamedCurve::P521 => known::secp521r1(),
    }
}

/// Map an ECC curve OID to its `NamedCurve`.
pub(crate) fn oid_to_curve(oid: &Oid) -> Option<NamedCurve> {
    if *oid == known::prime256v1() {
        Some(NamedCurve::P256)
    } else if *oid == known::secp384r1() {
        Some(NamedCurve::P384)
    } else if *oid == known::secp521r1() {
        Some(NamedCurve::P521)
    } else {
        None
    }
}

/// OID of the SubjectPublicKeyInfo algorithm (not the curve).
pub(crate) fn key_algorithm_oid(alg: KeyAlgorithm) -> Oid {
    match alg {
        KeyAlgorithm::Rsa => known::rsa_encryption(),
        KeyAlgorithm::Ec(_) => known::ec_public_key(),
        KeyAlgorithm::Ed25519 => known::ed25519(),
    }
}
