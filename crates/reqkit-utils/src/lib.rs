#![forbid(unsafe_code)]
#![doc = "Utility functions for reqkit: ASN.1 DER, Base64, PEM, OID."]

#[cfg(feature = "asn1")]
pub mod asn1;

#[cfg(feature = "base64")]
pub mod base64;

#[cfg(feature = "pem")]
pub mod pem;

#[cfg(feature = "oid")]
pub mod oid;
