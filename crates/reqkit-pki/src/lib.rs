#![forbid(unsafe_code)]
#![doc = "PKCS#10 certificate request assembly and X.509 Name parsing for reqkit."]

#[cfg(feature = "x509")]
mod oid_mapping;

#[cfg(feature = "x509")]
pub mod x509;
