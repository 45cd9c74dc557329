//! Signature AlgorithmIdentifier encoding and lookup.

use reqkit_types::{CsrError, SignatureAlgorithm};
use reqkit_utils::asn1::{Decoder, Node};
use reqkit_utils::oid::Oid;
use tracing::warn;

use crate::oid_mapping::{oid_to_signature_algorithm, signature_oid};

/// `SEQUENCE { OID, NULL }` for RSA algorithms, `SEQUENCE { OID }` otherwise.
pub fn algorithm_identifier(alg: SignatureAlgorithm) -> Node {
    let mut children = vec![Node::oid(&signature_oid(alg).to_der_value())];
    if alg.has_null_params() {
        children.push(Node::Null);
    }
    Node::sequence(children)
}

/// Gate legacy algorithms.
///
/// Every legacy use is logged; with `allow_legacy` unset it is refused.
pub fn check_algorithm(alg: SignatureAlgorithm, allow_legacy: bool) -> Result<(), CsrError> {
    if !alg.is_legacy() {
        return Ok(());
    }
    if !allow_legacy {
        return Err(CsrError::InsecureAlgorithm(alg.name().to_string()));
    }
    warn!(
        algorithm = alg.name(),
        "legacy signature algorithm in certificate request; most CAs reject it"
    );
    Ok(())
}

/// Parse a signature AlgorithmIdentifier at the cursor.
pub fn parse_algorithm_identifier(dec: &mut Decoder) -> Result<SignatureAlgorithm, CsrError> {
    let mut alg_dec = dec.read_sequence()?;
    let oid = Oid::from_der_value(alg_dec.read_oid()?)?;
    let alg = oid_to_signature_algorithm(&oid)
        .ok_or_else(|| CsrError::UnsupportedAlgorithm(oid.to_dot_string()))?;
    // NULL parameters are tolerated on any algorithm
    if !alg_dec.is_empty() {
        alg_dec.read_null()?;
    }
    if !alg_dec.is_empty() {
        return Err(CsrError::MalformedLength);
    }
    Ok(alg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Records the level and fields of every event.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(Level, String)>>>);

    struct FieldText(String);

    impl Visit for FieldText {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            let _ = write!(self.0, "{}={:?} ", field.name(), value);
        }
    }

    impl<S: Subscriber> Layer<S> for Recorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut text = FieldText(String::new());
            event.record(&mut text);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), text.0));
        }
    }

    fn events_during(f: impl FnOnce()) -> Vec<(Level, String)> {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        tracing::subscriber::with_default(subscriber, f);
        let events = recorder.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn test_sha1_rsa_identifier() {
        let der = algorithm_identifier(SignatureAlgorithm::Sha1WithRsa).to_der();
        assert_eq!(
            der,
            &[
                0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05, 0x05,
                0x00
            ]
        );
    }

    #[test]
    fn test_ecdsa_identifier_has_no_params() {
        let der = algorithm_identifier(SignatureAlgorithm::EcdsaWithSha256).to_der();
        assert_eq!(
            der,
            &[0x30, 0x0A, 0x06, 0x08, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02]
        );
        let der = algorithm_identifier(SignatureAlgorithm::Ed25519).to_der();
        assert_eq!(der, &[0x30, 0x05, 0x06, 0x03, 0x2B, 0x65, 0x70]);
    }

    #[test]
    fn test_legacy_gate() {
        assert!(check_algorithm(SignatureAlgorithm::Sha1WithRsa, true).is_ok());
        assert!(check_algorithm(SignatureAlgorithm::Sha256WithRsa, false).is_ok());
        assert_eq!(
            check_algorithm(SignatureAlgorithm::Md5WithRsa, false),
            Err(CsrError::InsecureAlgorithm("md5WithRSAEncryption".into()))
        );
    }

    #[test]
    fn test_legacy_use_logs_warning() {
        let events = events_during(|| {
            check_algorithm(SignatureAlgorithm::Sha1WithRsa, true).unwrap();
            check_algorithm(SignatureAlgorithm::Md5WithRsa, true).unwrap();
        });
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(level, _)| *level == Level::WARN));
        assert!(events[0].1.contains("sha1WithRSAEncryption"));
        assert!(events[0].1.contains("legacy signature algorithm"));
        assert!(events[1].1.contains("md5WithRSAEncryption"));
    }

    #[test]
    fn test_modern_or_refused_use_logs_nothing() {
        let events = events_during(|| {
            check_algorithm(SignatureAlgorithm::Sha256WithRsa, true).unwrap();
            check_algorithm(SignatureAlgorithm::Ed25519, false).unwrap();
            assert!(check_algorithm(SignatureAlgorithm::Sha1WithRsa, false).is_err());
        });
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_roundtrip_all() {
        for alg in SignatureAlgorithm::ALL {
            let der = algorithm_identifier(alg).to_der();
            let mut dec = Decoder::new(&der);
            assert_eq!(parse_algorithm_identifier(&mut dec).unwrap(), alg);
            assert!(dec.is_empty());
        }
    }

    #[test]
    fn test_parse_unknown_oid() {
        // rsaEncryption is a key algorithm, not a signature algorithm
        let der = [
            0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01, 0x05,
            0x00,
        ];
        assert_eq!(
            parse_algorithm_identifier(&mut Decoder::new(&der)),
            Err(CsrError::UnsupportedAlgorithm("1.2.840.113549.1.1.1".into()))
        );
    }
}
