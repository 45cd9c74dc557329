//! Composable DER element tree.

use super::{length_octets, tags, Encoder, StringKind};
use reqkit_types::DerError;

/// An ASN.1 element held as a tree.
///
/// Constructed nodes own their children in order; leaves own their scalar
/// content. A tree is encoded with [`Node::to_der`], and its size is known
/// through [`Node::encoded_len`] without producing any bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// INTEGER content octets, already in minimal two's complement form.
    Integer(Vec<u8>),
    BitString { unused_bits: u8, data: Vec<u8> },
    Null,
    /// OBJECT IDENTIFIER content octets.
    Oid(Vec<u8>),
    String { kind: StringKind, value: String },
    Sequence(Vec<Node>),
    Set(Vec<Node>),
    /// Constructed context-specific `[number]` wrapper.
    ContextSpecific { number: u8, children: Vec<Node> },
}

impl Node {
    /// Non-negative INTEGER.
    pub fn unsigned_integer(value: u64) -> Self {
        let bytes = value.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
        let mut content = Vec::with_capacity(9);
        if bytes[skip] & 0x80 != 0 {
            content.push(0x00);
        }
        content.extend_from_slice(&bytes[skip..]);
        Node::Integer(content)
    }

    /// BIT STRING with no unused bits.
    pub fn bit_string(data: &[u8]) -> Self {
        Node::BitString {
            unused_bits: 0,
            data: data.to_vec(),
        }
    }

    /// OBJECT IDENTIFIER from its DER content octets.
    pub fn oid(der_value: &[u8]) -> Self {
        Node::Oid(der_value.to_vec())
    }

    /// Character string; fails if `value` is outside the repertoire of `kind`.
    pub fn string(kind: StringKind, value: &str) -> Result<Self, DerError> {
        kind.validate(value)?;
        Ok(Node::String {
            kind,
            value: value.to_string(),
        })
    }

    pub fn sequence(children: Vec<Node>) -> Self {
        Node::Sequence(children)
    }

    pub fn set(children: Vec<Node>) -> Self {
        Node::Set(children)
    }

    /// Identifier octet of this node.
    pub fn tag(&self) -> u8 {
        match self {
            Node::Integer(_) => tags::INTEGER,
            Node::BitString { .. } => tags::BIT_STRING,
            Node::Null => tags::NULL,
            Node::Oid(_) => tags::OID,
            Node::String { kind, .. } => kind.tag(),
            Node::Sequence(_) => tags::SEQUENCE,
            Node::Set(_) => tags::SET,
            Node::ContextSpecific { number, .. } => {
                tags::CONTEXT_SPECIFIC | tags::CONSTRUCTED | (number & 0x1F)
            }
        }
    }

    /// Length of the content octets.
    pub fn content_len(&self) -> usize {
        match self {
            Node::Integer(content) | Node::Oid(content) => content.len(),
            Node::BitString { data, .. } => data.len() + 1,
            Node::Null => 0,
            Node::String { value, .. } => value.len(),
            Node::Sequence(children)
            | Node::Set(children)
            | Node::ContextSpecific { children, .. } => {
                children.iter().map(Node::encoded_len).sum()
            }
        }
    }

    /// Total encoded size: identifier, length field and content.
    pub fn encoded_len(&self) -> usize {
        let content = self.content_len();
        1 + length_octets(content) + content
    }

    /// Append the DER encoding of this node to `enc`.
    pub fn encode_into(&self, enc: &mut Encoder) {
        enc.write_header(self.tag(), self.content_len());
        match self {
            Node::Integer(content) | Node::Oid(content) => {
                enc.write_raw(content);
            }
            Node::BitString { unused_bits, data } => {
                enc.write_raw(&[*unused_bits]).write_raw(data);
            }
            Node::Null => {}
            Node::String { value, .. } => {
                enc.write_raw(value.as_bytes());
            }
            Node::Sequence(children) | Node::ContextSpecific { children, .. } => {
                for child in children {
                    child.encode_into(enc);
                }
            }
            Node::Set(children) => {
                // DER orders SET OF members by their encodings
                let mut encoded: Vec<Vec<u8>> = children.iter().map(Node::to_der).collect();
                encoded.sort();
                for member in &encoded {
                    enc.write_raw(member);
                }
            }
        }
    }

    /// Encode the whole tree.
    pub fn to_der(&self) -> Vec<u8> {
        let mut enc = Encoder::with_capacity(self.encoded_len());
        self.encode_into(&mut enc);
        enc.finish()
    }
}
