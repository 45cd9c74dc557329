#![no_main]
use libfuzzer_sys::fuzz_target;
use reqkit_pki::x509::Subject;

fuzz_target!(|data: &[u8]| {
    // first byte picks the offset so non-zero starts get exercised too
    let Some((&skip, rest)) = data.split_first() else {
        return;
    };
    let offset = usize::from(skip) % (rest.len() + 1);
    if let Ok((subject, end)) = Subject::from_der_at(rest, offset) {
        assert!(end > offset && end <= rest.len());
        assert_eq!(subject.to_der(), &rest[offset..end]);
    }
});
