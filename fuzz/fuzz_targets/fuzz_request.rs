#![no_main]
use libfuzzer_sys::fuzz_target;
use reqkit_pki::x509::CertificationRequest;

fuzz_target!(|data: &[u8]| {
    if let Ok(csr) = CertificationRequest::from_der(data) {
        let reparsed = CertificationRequest::from_der(csr.der()).expect("re-encoded request parses");
        assert_eq!(reparsed, csr);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = CertificationRequest::from_pem(text);
    }
});
