/// Errors raised by the DER primitives (tags, lengths, strings, OIDs, PEM).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerError {
    #[error("unexpected tag: expected 0x{expected:02X}, found 0x{found:02X}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("malformed DER length")]
    MalformedLength,
    #[error("truncated input: need {need} bytes, {available} available")]
    TruncatedInput { need: usize, available: usize },
    #[error("value is not a valid {kind}")]
    InvalidStringEncoding { kind: &'static str },
    #[error("invalid object identifier")]
    InvalidOid,
    #[error("integer does not fit the target type")]
    IntegerOverflow,
    #[error("invalid base64 input")]
    InvalidBase64,
    #[error("invalid PEM: {0}")]
    InvalidPem(String),
}

/// Certificate request and subject errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsrError {
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("unsupported attribute type: {0}")]
    UnsupportedAttributeType(String),
    #[error("request attributes are not supported ({len} content bytes)")]
    UnsupportedRequestAttributes { len: usize },
    #[error("value is not a valid {kind}")]
    InvalidStringEncoding { kind: &'static str },
    #[error("public key material is empty")]
    EmptyKeyMaterial,
    #[error("malformed DER length")]
    MalformedLength,
    #[error("unexpected tag: expected 0x{expected:02X}, found 0x{found:02X}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("truncated input: need {need} bytes, {available} available")]
    TruncatedInput { need: usize, available: usize },
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("legacy algorithm rejected by configuration: {0}")]
    InsecureAlgorithm(String),
    #[error("der error: {0}")]
    Der(DerError),
}

impl From<DerError> for CsrError {
    fn from(e: DerError) -> Self {
        match e {
            DerError::UnexpectedTag { expected, found } => {
                CsrError::UnexpectedTag { expected, found }
            }
            DerError::MalformedLength => CsrError::MalformedLength,
            DerError::TruncatedInput { need, available } => {
                CsrError::TruncatedInput { need, available }
            }
            DerError::InvalidStringEncoding { kind } => CsrError::InvalidStringEncoding { kind },
            other => CsrError::Der(other),
        }
    }
}
