//! SubjectPublicKeyInfo container.

use reqkit_types::{CsrError, KeyAlgorithm};
use reqkit_utils::asn1::{Decoder, Node};
use reqkit_utils::oid::{known, Oid};

use crate::oid_mapping::{curve_oid, key_algorithm_oid, oid_to_curve};

/// Raw public key bytes tagged with their algorithm.
///
/// The key bytes are opaque; nothing checks that they form a valid key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    algorithm: KeyAlgorithm,
    key: Vec<u8>,
}

impl PublicKeyInfo {
    pub fn new(algorithm: KeyAlgorithm, key: &[u8]) -> Result<Self, CsrError> {
        if key.is_empty() {
            return Err(CsrError::EmptyKeyMaterial);
        }
        Ok(Self {
            algorithm,
            key: key.to_vec(),
        })
    }

    /// An rsaEncryption key.
    pub fn rsa(key: &[u8]) -> Result<Self, CsrError> {
        Self::new(KeyAlgorithm::Rsa, key)
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn key_bytes(&self) -> &[u8] {
        &self.key
    }

    /// `SEQUENCE { OID, params? }`: NULL for RSA, the curve OID for EC,
    /// nothing for Ed25519.
    pub fn algorithm_identifier(&self) -> Node {
        let mut children = vec![Node::oid(&key_algorithm_oid(self.algorithm).to_der_value())];
        match self.algorithm {
            KeyAlgorithm::Rsa => children.push(Node::Null),
            KeyAlgorithm::Ec(curve) => children.push(Node::oid(&curve_oid(curve).to_der_value())),
            KeyAlgorithm::Ed25519 => {}
        }
        Node::sequence(children)
    }

    /// `SEQUENCE { AlgorithmIdentifier, BIT STRING }`
    pub fn to_node(&self) -> Node {
        Node::sequence(vec![self.algorithm_identifier(), Node::bit_string(&self.key)])
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.to_node().to_der()
    }

    pub fn encoded_len(&self) -> usize {
        self.to_node().encoded_len()
    }

    /// Parse a SubjectPublicKeyInfo at the cursor.
    pub fn parse(dec: &mut Decoder) -> Result<Self, CsrError> {
        let mut spki = dec.read_sequence()?;
        let mut alg = spki.read_sequence()?;
        let oid = Oid::from_der_value(alg.read_oid()?)?;

        let algorithm = if oid == known::rsa_encryption() {
            // NULL parameters are required but tolerated when absent
            if !alg.is_empty() {
                alg.read_null()?;
            }
            KeyAlgorithm::Rsa
        } else if oid == known::ec_public_key() {
            let curve = Oid::from_der_value(alg.read_oid()?)?;
            let curve = oid_to_curve(&curve)
                .ok_or_else(|| CsrError::UnsupportedAlgorithm(curve.to_dot_string()))?;
            KeyAlgorithm::Ec(curve)
        } else if oid == known::ed25519() {
            KeyAlgorithm::Ed25519
        } else {
            return Err(CsrError::UnsupportedAlgorithm(oid.to_dot_string()));
        };
        if !alg.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        let (unused_bits, key) = spki.read_bit_string()?;
        if unused_bits != 0 || !spki.is_empty() {
            return Err(CsrError::MalformedLength);
        }
        Self::new(algorithm, key)
    }
}
