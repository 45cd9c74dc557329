//! X.509 Name and PKCS#10 certification request support.

mod attribute;
mod config;
mod public_key;
mod request;
mod signature;
mod subject;

pub use attribute::{AttributeType, AttributeValue};
pub use config::{DirectoryStringPolicy, RequestConfig, RequestConfigBuilder};
pub use public_key::PublicKeyInfo;
pub use request::{
    subject_offset, CertificationRequest, CertificationRequestBuilder, Version, PEM_LABEL,
};
pub use signature::{algorithm_identifier, check_algorithm, parse_algorithm_identifier};
pub use subject::{Subject, SubjectFields};

pub use reqkit_types::{KeyAlgorithm, NamedCurve, SignatureAlgorithm};
