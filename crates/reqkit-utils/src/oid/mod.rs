//! Object identifiers: arcs, dotted text and DER content octets.

use std::fmt;
use std::str::FromStr;

use reqkit_types::DerError;

/// An object identifier held as its arc values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Well-known constants only; other callers go through [`Oid::from_arcs`].
    pub(crate) fn new(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Create an OID from arcs, checking that they have a DER encoding.
    pub fn from_arcs(arcs: &[u32]) -> Result<Self, DerError> {
        match arcs {
            [first, second, ..] if *first <= 2 && (*first == 2 || *second < 40) => {
                if *first == 2 && second.checked_add(80).is_none() {
                    return Err(DerError::InvalidOid);
                }
                Ok(Self::new(arcs))
            }
            _ => Err(DerError::InvalidOid),
        }
    }

    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Content octets of the OBJECT IDENTIFIER (no identifier or length).
    ///
    /// The first two arcs share one subidentifier, `40 * first + second`;
    /// every constructor guarantees it fits a `u32`.
    pub fn to_der_value(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.arcs.len() + 4);
        if let [first, second, rest @ ..] = self.arcs.as_slice() {
            push_base128(&mut out, first * 40 + second);
            rest.iter().for_each(|&arc| push_base128(&mut out, arc));
        }
        out
    }

    /// Decode OBJECT IDENTIFIER content octets.
    pub fn from_der_value(data: &[u8]) -> Result<Self, DerError> {
        let (first, mut rest) = take_base128(data)?;
        let mut arcs = match first {
            0..=39 => vec![0, first],
            40..=79 => vec![1, first - 40],
            _ => vec![2, first - 80],
        };
        while !rest.is_empty() {
            let (arc, tail) = take_base128(rest)?;
            arcs.push(arc);
            rest = tail;
        }
        Ok(Self { arcs })
    }

    /// Dotted form, e.g. `2.5.4.3`.
    pub fn to_dot_string(&self) -> String {
        let mut out = String::new();
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&arc.to_string());
        }
        out
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot_string())
    }
}

impl FromStr for Oid {
    type Err = DerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| DerError::InvalidOid))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_arcs(&arcs)
    }
}

/// Append `value` as big-endian base-128 groups, high bit set on all but the last.
fn push_base128(out: &mut Vec<u8>, value: u32) {
    let groups = ((u32::BITS - value.leading_zeros()).max(1)).div_ceil(7);
    for shift in (0..groups).rev() {
        let group = ((value >> (shift * 7)) & 0x7F) as u8;
        out.push(if shift == 0 { group } else { group | 0x80 });
    }
}

/// Read one subidentifier, returning it and the unread tail.
fn take_base128(data: &[u8]) -> Result<(u32, &[u8]), DerError> {
    // 0x80 first would be a padded (non-minimal) subidentifier
    if matches!(data.first(), None | Some(0x80)) {
        return Err(DerError::InvalidOid);
    }
    let mut value: u32 = 0;
    for (i, &octet) in data.iter().enumerate() {
        value = value.checked_mul(128).ok_or(DerError::InvalidOid)? | u32::from(octet & 0x7F);
        if octet & 0x80 == 0 {
            return Ok((value, &data[i + 1..]));
        }
    }
    Err(DerError::InvalidOid)
}

// Well-known OIDs
pub mod known {
    use super::Oid;

    // Public key algorithms
    pub fn rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 1])
    }
    pub fn ec_public_key() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 2, 1])
    }
    pub fn ed25519() -> Oid {
        Oid::new(&[1, 3, 101, 112])
    }

    // Named curves
    pub fn prime256v1() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 3, 1, 7])
    }
    pub fn secp384r1() -> Oid {
        Oid::new(&[1, 3, 132, 0, 34])
    }
    pub fn secp521r1() -> Oid {
        Oid::new(&[1, 3, 132, 0, 35])
    }

    // Signature algorithms
    pub fn md5_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 4])
    }
    pub fn sha1_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 5])
    }
    pub fn sha224_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 14])
    }
    pub fn sha256_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 11])
    }
    pub fn sha384_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 12])
    }
    pub fn sha512_with_rsa_encryption() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 1, 13])
    }
    pub fn ecdsa_with_sha256() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 2])
    }
    pub fn ecdsa_with_sha384() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 3])
    }
    pub fn ecdsa_with_sha512() -> Oid {
        Oid::new(&[1, 2, 840, 10045, 4, 3, 4])
    }

    // DN Attribute Type OIDs (X.520)
    pub fn common_name() -> Oid {
        Oid::new(&[2, 5, 4, 3])
    }
    pub fn surname() -> Oid {
        Oid::new(&[2, 5, 4, 4])
    }
    pub fn serial_number_attr() -> Oid {
        Oid::new(&[2, 5, 4, 5])
    }
    pub fn country_name() -> Oid {
        Oid::new(&[2, 5, 4, 6])
    }
    pub fn locality_name() -> Oid {
        Oid::new(&[2, 5, 4, 7])
    }
    pub fn state_or_province_name() -> Oid {
        Oid::new(&[2, 5, 4, 8])
    }
    pub fn street_address() -> Oid {
        Oid::new(&[2, 5, 4, 9])
    }
    pub fn organization_name() -> Oid {
        Oid::new(&[2, 5, 4, 10])
    }
    pub fn organizational_unit_name() -> Oid {
        Oid::new(&[2, 5, 4, 11])
    }
    pub fn title() -> Oid {
        Oid::new(&[2, 5, 4, 12])
    }
    pub fn given_name() -> Oid {
        Oid::new(&[2, 5, 4, 42])
    }
    pub fn email_address() -> Oid {
        Oid::new(&[1, 2, 840, 113549, 1, 9, 1])
    }
    pub fn domain_component() -> Oid {
        Oid::new(&[0, 9, 2342, 19200300, 100, 1, 25])
    }
}
