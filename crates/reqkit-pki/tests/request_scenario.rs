//! End-to-end request assembly against pinned DER fixtures.

use reqkit_pki::x509::{
    AttributeType, CertificationRequest, PublicKeyInfo, RequestConfig, SignatureAlgorithm,
    Subject, Version,
};
use reqkit_types::CsrError;

fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

const SUBJECT_HEX: &str = "30818a310b3009060355040613024445310f300d060355040813064265726c696e\
310f300d060355040713064265726c696e31143012060355040a130b4578616d706c6520496e63\
310b3009060355040b13024954311430120603550403130b6578616d706c652e636f6d\
3120301e06092a864886f70d010901161161646d696e406578616d706c652e636f6d";

fn scenario_subject() -> Subject {
    Subject::new(
        "example.com",
        "admin@example.com",
        "Example Inc",
        "Berlin",
        "Berlin",
        "DE",
        "IT",
    )
    .unwrap()
}

fn scenario_request() -> CertificationRequest {
    CertificationRequest::builder(scenario_subject())
        .version("0".parse().unwrap())
        .public_key(PublicKeyInfo::rsa(&[0u8; 64]).unwrap())
        .signature_algorithm(SignatureAlgorithm::Sha1WithRsa)
        .signature(&[0u8; 20])
        .build()
        .unwrap()
}

#[test]
fn test_scenario_subject_bytes() {
    let subject = scenario_subject();
    assert_eq!(subject.to_der(), hex(SUBJECT_HEX));
    assert_eq!(subject.encoded_len(), 141);
}

#[test]
fn test_scenario_request_length() {
    let csr = scenario_request();
    let der = csr.to_der();
    assert_eq!(der.len(), 273);
    assert_eq!(csr.der_len(), 273);
    // SEQUENCE(269) { SEQUENCE(228) { INTEGER 0, ...
    assert_eq!(&der[..10], &[0x30, 0x82, 0x01, 0x0D, 0x30, 0x81, 0xE4, 0x02, 0x01, 0x00]);
    assert_eq!(&der[10..151], hex(SUBJECT_HEX).as_slice());
    // signature BIT STRING closes the request
    assert_eq!(&der[der.len() - 23..der.len() - 20], &[0x03, 0x15, 0x00]);
}

#[test]
fn test_scenario_pem() {
    let csr = scenario_request();
    let pem = csr.to_pem();
    assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----\nMIIBDTCB5AIBADCBijEL"));
    assert!(pem.ends_with("\n-----END CERTIFICATE REQUEST-----"));

    let lines: Vec<&str> = pem.split('\n').collect();
    let body = &lines[1..lines.len() - 1];
    // 273 bytes -> 364 base64 characters
    assert_eq!(body.len(), 6);
    assert!(body[..5].iter().all(|l| l.len() == 64));
    assert_eq!(body[5].len(), 44);

    let parsed = CertificationRequest::from_pem(&pem).unwrap();
    assert_eq!(parsed.subject(), &scenario_subject());
    assert_eq!(parsed.to_der(), csr.to_der());
    assert_eq!(parsed.version(), Version::V1);
}

#[test]
fn test_scenario_subject_via_cursor() {
    let csr = scenario_request();
    let der = csr.to_der();
    let (subject, end) = Subject::from_der_at(&der, 10).unwrap();
    assert_eq!(subject, scenario_subject());
    assert_eq!(end, 151);
}

#[test]
fn test_invalid_version_string() {
    assert_eq!(
        "abc".parse::<Version>(),
        Err(CsrError::InvalidVersion("abc".into()))
    );
    assert!(matches!("-3".parse::<Version>(), Err(CsrError::InvalidVersion(_))));
}

#[test]
fn test_truncated_name() {
    let mut der = hex(SUBJECT_HEX);
    der.truncate(60);
    assert_eq!(
        Subject::from_der_at(&der, 0),
        Err(CsrError::TruncatedInput {
            need: 138,
            available: 57
        })
    );
}

#[test]
fn test_modern_config_rejects_sha1_default() {
    let err = CertificationRequest::builder(scenario_subject())
        .public_key(PublicKeyInfo::rsa(&[0u8; 64]).unwrap())
        .config(
            RequestConfig::builder()
                .allow_legacy_algorithms(false)
                .build(),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        CsrError::InsecureAlgorithm("sha1WithRSAEncryption".into())
    );
}

#[test]
fn test_generic_subject_roundtrip() {
    let subject = Subject::default()
        .with(AttributeType::DomainComponent, "com")
        .unwrap()
        .with(AttributeType::DomainComponent, "example")
        .unwrap()
        .with(AttributeType::GivenName, "Jörg")
        .unwrap()
        .with(AttributeType::SerialNumber, "1234")
        .unwrap();
    let csr = CertificationRequest::new(
        Version::V1,
        subject.clone(),
        PublicKeyInfo::rsa(&[7u8; 16]).unwrap(),
        &[1, 2, 3],
    )
    .unwrap();
    let parsed = CertificationRequest::from_der(csr.der()).unwrap();
    assert_eq!(parsed.subject(), &subject);
    assert_eq!(
        parsed.subject().to_string(),
        "DC=com, DC=example, GN=Jörg, serialNumber=1234"
    );
}

#[test]
fn test_build_pem_matches_request_pem() {
    let pem = CertificationRequest::builder(scenario_subject())
        .public_key(PublicKeyInfo::rsa(&[0u8; 64]).unwrap())
        .signature(&[0u8; 20])
        .build_pem()
        .unwrap();
    assert_eq!(pem, scenario_request().to_pem());
    assert_eq!(CertificationRequest::from_pem(&pem).unwrap(), scenario_request());
}
