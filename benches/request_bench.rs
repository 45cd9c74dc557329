//! Certificate request assembly and subject parsing benchmarks.
//!
//! Run with: cargo bench -p reqkit-pki

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reqkit_pki::x509::{
    CertificationRequest, PublicKeyInfo, Subject, SubjectFields, Version,
};

fn sample_subject() -> Subject {
    let fields = SubjectFields {
        common_name: "example.com".into(),
        email: "admin@example.com".into(),
        organization: "Example Inc".into(),
        locality: "Berlin".into(),
        state: "Berlin".into(),
        country: "DE".into(),
        organizational_unit: "IT".into(),
    };
    Subject::from_fields(&fields, Default::default()).expect("valid subject")
}

fn bench_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("request");

    for key_len in [64usize, 256, 512] {
        let key = vec![0x5Au8; key_len];
        let signature = vec![0xA5u8; key_len];

        group.bench_with_input(BenchmarkId::new("assemble", key_len), &key_len, |bench, _| {
            bench.iter(|| {
                CertificationRequest::new(
                    Version::V1,
                    sample_subject(),
                    PublicKeyInfo::rsa(&key).expect("key"),
                    &signature,
                )
                .expect("request")
                .to_der()
            });
        });

        let csr = CertificationRequest::new(
            Version::V1,
            sample_subject(),
            PublicKeyInfo::rsa(&key).expect("key"),
            &signature,
        )
        .expect("request");
        group.bench_with_input(BenchmarkId::new("to_pem", key_len), &key_len, |bench, _| {
            bench.iter(|| csr.to_pem());
        });
    }

    group.finish();
}

fn bench_subject(c: &mut Criterion) {
    let der = sample_subject().to_der();
    c.bench_function("subject/parse", |bench| {
        bench.iter(|| Subject::from_der(&der).expect("parse"));
    });
}

criterion_group!(benches, bench_request, bench_subject);
criterion_main!(benches);
