//! PKCS#10 certification request assembly, serialization and parsing (RFC 2986).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use reqkit_types::{CsrError, SignatureAlgorithm};
use reqkit_utils::asn1::{tags, Decoder, Node};
use tracing::debug;

use super::config::RequestConfig;
use super::public_key::PublicKeyInfo;
use super::signature::{algorithm_identifier, check_algorithm, parse_algorithm_identifier};
use super::subject::Subject;

/// PEM label of a certification request.
pub const PEM_LABEL: &str = "CERTIFICATE REQUEST";

/// Request version number. Only v1 (0) is defined, but any non-negative
/// value is carried through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(u64);

impl Version {
    pub const V1: Version = Version(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// From INTEGER content octets.
    fn from_der(bytes: &[u8]) -> Result<Self, CsrError> {
        match bytes.first() {
            None => Err(CsrError::MalformedLength),
            Some(b) if b & 0x80 != 0 => Err(CsrError::InvalidVersion("negative INTEGER".into())),
            // a leading zero is only allowed in front of a high-bit octet
            Some(0) if bytes.len() > 1 && bytes[1] & 0x80 == 0 => Err(CsrError::InvalidVersion(
                "non-minimal INTEGER encoding".into(),
            )),
            Some(_) => {
                let magnitude = match bytes {
                    [0, rest @ ..] => rest,
                    _ => bytes,
                };
                if magnitude.len() > 8 {
                    return Err(CsrError::InvalidVersion(format!(
                        "{}-byte INTEGER",
                        bytes.len()
                    )));
                }
                Ok(Self(
                    magnitude
                        .iter()
                        .fold(0u64, |acc, &b| (acc << 8) | b as u64),
                ))
            }
        }
    }
}

impl TryFrom<i64> for Version {
    type Error = CsrError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Version)
            .map_err(|_| CsrError::InvalidVersion(value.to_string()))
    }
}

impl FromStr for Version {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| CsrError::InvalidVersion(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A PKCS#10 certification request.
///
/// The DER tree is built once at construction; the encoded bytes are
/// produced on first use and kept.
#[derive(Debug, Clone)]
pub struct CertificationRequest {
    version: Version,
    subject: Subject,
    public_key: PublicKeyInfo,
    signature_algorithm: SignatureAlgorithm,
    signature: Vec<u8>,
    attributes: bool,
    tree: Node,
    der: OnceLock<Vec<u8>>,
}

impl CertificationRequest {
    /// Assemble with the default configuration.
    pub fn new(
        version: Version,
        subject: Subject,
        public_key: PublicKeyInfo,
        signature: &[u8],
    ) -> Result<Self, CsrError> {
        CertificationRequestBuilder::new(subject)
            .version(version)
            .public_key(public_key)
            .signature(signature)
            .build()
    }

    pub fn builder(subject: Subject) -> CertificationRequestBuilder {
        CertificationRequestBuilder::new(subject)
    }

    fn assemble(
        version: Version,
        subject: Subject,
        public_key: PublicKeyInfo,
        signature_algorithm: SignatureAlgorithm,
        signature: Vec<u8>,
        attributes: bool,
    ) -> Self {
        let mut info = vec![
            Node::unsigned_integer(version.value()),
            subject.to_node(),
            public_key.to_node(),
        ];
        // attributes [0] IMPLICIT SET OF Attribute
        if attributes {
            info.push(Node::ContextSpecific {
                number: 0,
                children: Vec::new(),
            });
        }
        let tree = Node::sequence(vec![
            Node::sequence(info),
            algorithm_identifier(signature_algorithm),
            Node::bit_string(&signature),
        ]);

        debug!(
            der_len = tree.encoded_len(),
            rdns = subject.len(),
            algorithm = signature_algorithm.name(),
            "assembled certificate request"
        );

        Self {
            version,
            subject,
            public_key,
            signature_algorithm,
            signature,
            attributes,
            tree,
            der: OnceLock::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn public_key(&self) -> &PublicKeyInfo {
        &self.public_key
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Whether the request info carries the `[0]` attributes field.
    pub fn has_attributes(&self) -> bool {
        self.attributes
    }

    /// The encoded request, computed once.
    pub fn der(&self) -> &[u8] {
        self.der.get_or_init(|| self.tree.to_der())
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.der().to_vec()
    }

    /// Encoded length, computed from the tree without serializing.
    pub fn der_len(&self) -> usize {
        self.tree.encoded_len()
    }

    /// The CertificationRequestInfo encoding, i.e. the bytes a signer signs.
    pub fn certification_request_info_der(&self) -> Vec<u8> {
        match &self.tree {
            Node::Sequence(children) => children.first().map(Node::to_der).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn to_pem(&self) -> String {
        reqkit_utils::pem::encode(PEM_LABEL, self.der())
    }

    /// Parse a DER request. Bytes after the outer SEQUENCE are rejected.
    ///
    /// Only an empty `[0]` attributes field is understood.
    pub fn from_der(data: &[u8]) -> Result<Self, CsrError> {
        let mut dec = Decoder::new(data);
        let mut outer = dec.read_sequence()?;
        if !dec.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        let mut info = outer.read_sequence()?;
        let version = Version::from_der(info.read_integer()?)?;
        let subject = Subject::parse(&mut info)?;
        let public_key = PublicKeyInfo::parse(&mut info)?;
        let attributes = match info.try_read_context_specific(0, true)? {
            Some(tlv) if !tlv.value.is_empty() => {
                return Err(CsrError::UnsupportedRequestAttributes {
                    len: tlv.value.len(),
                });
            }
            Some(_) => true,
            None => false,
        };
        if !info.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        let signature_algorithm = parse_algorithm_identifier(&mut outer)?;
        let (unused_bits, signature) = outer.read_bit_string()?;
        if unused_bits != 0 || !outer.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        Ok(Self::assemble(
            version,
            subject,
            public_key,
            signature_algorithm,
            signature.to_vec(),
            attributes,
        ))
    }

    /// Parse the first `CERTIFICATE REQUEST` block of a PEM document.
    pub fn from_pem(pem: &str) -> Result<Self, CsrError> {
        let der = reqkit_utils::pem::parse_one(pem, PEM_LABEL)?;
        Self::from_der(&der)
    }
}

impl PartialEq for CertificationRequest {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl Eq for CertificationRequest {}

/// Offset of the subject Name inside a DER request.
///
/// Works for any request layout, including ones with attributes that
/// [`CertificationRequest::from_der`] does not understand.
pub fn subject_offset(data: &[u8]) -> Result<usize, CsrError> {
    let mut dec = Decoder::new(data);
    dec.expect_tag(tags::SEQUENCE)?;
    dec.read_length()?;
    dec.expect_tag(tags::SEQUENCE)?;
    dec.read_length()?;
    dec.read_integer()?;
    Ok(dec.position())
}

/// Builder for [`CertificationRequest`].
pub struct CertificationRequestBuilder {
    subject: Subject,
    version: Version,
    public_key: Option<PublicKeyInfo>,
    signature_algorithm: Option<SignatureAlgorithm>,
    signature: Vec<u8>,
    config: RequestConfig,
}

impl CertificationRequestBuilder {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            version: Version::V1,
            public_key: None,
            signature_algorithm: None,
            signature: Vec::new(),
            config: RequestConfig::default(),
        }
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn public_key(mut self, public_key: PublicKeyInfo) -> Self {
        self.public_key = Some(public_key);
        self
    }

    /// Override the configured signature algorithm.
    pub fn signature_algorithm(mut self, alg: SignatureAlgorithm) -> Self {
        self.signature_algorithm = Some(alg);
        self
    }

    /// Externally produced signature bytes.
    pub fn signature(mut self, signature: &[u8]) -> Self {
        self.signature = signature.to_vec();
        self
    }

    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<CertificationRequest, CsrError> {
        let public_key = self.public_key.ok_or(CsrError::EmptyKeyMaterial)?;
        let alg = self
            .signature_algorithm
            .unwrap_or(self.config.signature_algorithm);
        check_algorithm(alg, self.config.allow_legacy_algorithms)?;

        let mut subject = self.subject;
        subject.resolve_policy(self.config.directory_string);

        Ok(CertificationRequest::assemble(
            self.version,
            subject,
            public_key,
            alg,
            self.signature,
            self.config.emit_attributes,
        ))
    }

    /// Build and encode as a PEM string.
    pub fn build_pem(self) -> Result<String, CsrError> {
        Ok(self.build()?.to_pem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{AttributeType, DirectoryStringPolicy, SubjectFields};
    use reqkit_types::DerError;
    use reqkit_utils::asn1::StringKind;

    fn request(config: RequestConfig) -> CertificationRequest {
        let subject = Subject::default()
            .with(AttributeType::CommonName, "Test")
            .unwrap();
        CertificationRequest::builder(subject)
            .public_key(PublicKeyInfo::rsa(&[0x01; 4]).unwrap())
            .signature(&[0xAA, 0xBB])
            .config(config)
            .build()
            .unwrap()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("0".parse::<Version>().unwrap(), Version::V1);
        assert_eq!(" 2 ".parse::<Version>().unwrap().value(), 2);
        assert_eq!(
            "abc".parse::<Version>(),
            Err(CsrError::InvalidVersion("abc".into()))
        );
        assert_eq!(
            Version::try_from(-1),
            Err(CsrError::InvalidVersion("-1".into()))
        );
    }

    #[test]
    fn test_version_from_der() {
        assert_eq!(Version::from_der(&[0x00]).unwrap(), Version::V1);
        assert_eq!(Version::from_der(&[0x00, 0x80]).unwrap().value(), 0x80);
        assert!(matches!(
            Version::from_der(&[0xFF]),
            Err(CsrError::InvalidVersion(_))
        ));
        assert!(matches!(
            Version::from_der(&[0x01; 9]),
            Err(CsrError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_version_from_der_rejects_padding() {
        assert_eq!(
            Version::from_der(&[0x00, 0x05]),
            Err(CsrError::InvalidVersion("non-minimal INTEGER encoding".into()))
        );
        assert!(Version::from_der(&[0x00, 0x00]).is_err());

        // INTEGER 02 02 00 00 in place of 02 01 00
        let mut der = request(RequestConfig::default()).to_der();
        der.splice(4..7, [0x02, 0x02, 0x00, 0x00]);
        der[1] += 1;
        der[3] += 1;
        assert!(matches!(
            CertificationRequest::from_der(&der),
            Err(CsrError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_config_policy_applies_to_subject() {
        let csr = request(
            RequestConfig::builder()
                .directory_string(DirectoryStringPolicy::Utf8Only)
                .build(),
        );
        let cn = &csr.subject().attributes()[0];
        assert_eq!(cn.kind(), StringKind::Utf8);
        // UTF8String tag inside the encoded Name
        assert_eq!(csr.der()[7 + 11], 0x0C);

        // an explicitly chosen policy is kept
        let fields = SubjectFields {
            common_name: "Test".into(),
            ..Default::default()
        };
        let subject =
            Subject::from_fields(&fields, DirectoryStringPolicy::PreferPrintable).unwrap();
        let csr = CertificationRequest::builder(subject)
            .public_key(PublicKeyInfo::rsa(&[0x01; 4]).unwrap())
            .config(
                RequestConfig::builder()
                    .directory_string(DirectoryStringPolicy::Utf8Only)
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(csr.subject().attributes()[0].kind(), StringKind::Printable);
    }

    #[test]
    fn test_from_der_rejects_request_attributes() {
        let csr = request(RequestConfig::builder().emit_attributes(true).build());
        let mut der = csr.to_der();
        // fill [0] with one NULL
        let at = 2 + csr.certification_request_info_der().len() - 2;
        der.splice(at..at + 2, [0xA0, 0x02, 0x05, 0x00]);
        der[1] += 2;
        der[3] += 2;
        assert_eq!(
            CertificationRequest::from_der(&der),
            Err(CsrError::UnsupportedRequestAttributes { len: 2 })
        );
    }

    #[test]
    fn test_exact_layout() {
        let csr = request(RequestConfig::default());
        let expected: Vec<u8> = [
            &[0x30, 0x42][..],
            // CertificationRequestInfo
            &[0x30, 0x2C, 0x02, 0x01, 0x00],
            &[
                0x30, 0x0F, 0x31, 0x0D, 0x30, 0x0B, 0x06, 0x03, 0x55, 0x04, 0x03, 0x13, 0x04, b'T',
                b'e', b's', b't',
            ],
            &[
                0x30, 0x16, 0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01,
                0x01, 0x05, 0x00, 0x03, 0x05, 0x00, 0x01, 0x01, 0x01, 0x01,
            ],
            // sha1WithRSAEncryption
            &[
                0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05, 0x05,
                0x00,
            ],
            &[0x03, 0x03, 0x00, 0xAA, 0xBB],
        ]
        .concat();
        assert_eq!(csr.der(), expected.as_slice());
        assert_eq!(csr.der_len(), expected.len());
        assert_eq!(csr.certification_request_info_der(), &expected[2..48]);
    }

    #[test]
    fn test_emit_attributes() {
        let plain = request(RequestConfig::default());
        let with_attrs = request(RequestConfig::builder().emit_attributes(true).build());
        assert_eq!(with_attrs.der_len(), plain.der_len() + 2);
        assert!(with_attrs.has_attributes());
        let info = with_attrs.certification_request_info_der();
        assert_eq!(&info[info.len() - 2..], &[0xA0, 0x00]);

        let parsed = CertificationRequest::from_der(with_attrs.der()).unwrap();
        assert_eq!(parsed, with_attrs);
    }

    #[test]
    fn test_legacy_rejected_when_disallowed() {
        let subject = Subject::default();
        let err = CertificationRequest::builder(subject)
            .public_key(PublicKeyInfo::rsa(&[1]).unwrap())
            .config(RequestConfig::modern())
            .signature_algorithm(SignatureAlgorithm::Sha1WithRsa)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CsrError::InsecureAlgorithm("sha1WithRSAEncryption".into())
        );
    }

    #[test]
    fn test_modern_default_algorithm() {
        let csr = request(RequestConfig::modern());
        assert_eq!(csr.signature_algorithm(), SignatureAlgorithm::Sha256WithRsa);
    }

    #[test]
    fn test_missing_public_key() {
        let err = CertificationRequest::builder(Subject::default())
            .build()
            .unwrap_err();
        assert_eq!(err, CsrError::EmptyKeyMaterial);
    }

    #[test]
    fn test_der_roundtrip() {
        let csr = request(RequestConfig::default());
        let parsed = CertificationRequest::from_der(csr.der()).unwrap();
        assert_eq!(parsed, csr);
        assert_eq!(parsed.signature(), &[0xAA, 0xBB]);
        assert_eq!(parsed.subject().common_name(), Some("Test"));
    }

    #[test]
    fn test_pem_roundtrip() {
        let csr = request(RequestConfig::default());
        let pem = csr.to_pem();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----\n"));
        assert!(pem.ends_with("\n-----END CERTIFICATE REQUEST-----"));
        assert_eq!(CertificationRequest::from_pem(&pem).unwrap(), csr);
    }

    #[test]
    fn test_from_der_rejects_trailing() {
        let mut der = request(RequestConfig::default()).to_der();
        der.push(0x00);
        assert_eq!(
            CertificationRequest::from_der(&der),
            Err(CsrError::MalformedLength)
        );
    }

    #[test]
    fn test_from_pem_without_block() {
        assert_eq!(
            CertificationRequest::from_pem("no armor here"),
            Err(CsrError::Der(DerError::InvalidPem(
                "no CERTIFICATE REQUEST block found".into()
            )))
        );
    }

    #[test]
    fn test_subject_offset() {
        let csr = request(RequestConfig::default());
        let offset = subject_offset(csr.der()).unwrap();
        assert_eq!(offset, 7);
        let (subject, _) = Subject::from_der_at(csr.der(), offset).unwrap();
        assert_eq!(&subject, csr.subject());
    }

    #[test]
    fn test_deterministic() {
        let a = request(RequestConfig::default());
        let b = request(RequestConfig::default());
        assert_eq!(a.to_der(), b.to_der());
    }
}
