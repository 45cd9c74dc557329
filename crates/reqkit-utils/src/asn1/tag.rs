//! ASN.1 identifier octet parsing.

use super::{Tag, TagClass};
use reqkit_types::DerError;

impl Tag {
    /// Parse a tag from the first bytes of `input`.
    /// Returns the tag and number of identifier bytes consumed.
    pub fn from_bytes(input: &[u8]) -> Result<(Self, usize), DerError> {
        let first = *input.first().ok_or(DerError::TruncatedInput {
            need: 1,
            available: 0,
        })?;

        let class = match first >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        };
        let constructed = (first & 0x20) != 0;

        let low_bits = first & 0x1F;
        if low_bits < 0x1F {
            return Ok((
                Tag {
                    class,
                    constructed,
                    number: low_bits as u32,
                },
                1,
            ));
        }

        // High tag number form: base-128 continuation bytes
        let mut number: u32 = 0;
        let mut i = 1;
        loop {
            let byte = *input.get(i).ok_or(DerError::TruncatedInput {
                need: i + 1,
                available: input.len(),
            })?;
            number = number.checked_mul(128).ok_or(DerError::IntegerOverflow)? | (byte & 0x7F) as u32;
            i += 1;
            if (byte & 0x80) == 0 {
                break;
            }
        }
        Ok((
            Tag {
                class,
                constructed,
                number,
            },
            i,
        ))
    }

    /// The single identifier octet for low tag numbers, `None` otherwise.
    pub fn to_byte(&self) -> Option<u8> {
        if self.number >= 0x1F {
            return None;
        }
        let class_bits = match self.class {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        };
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };
        Some(class_bits | constructed_bit | self.number as u8)
    }
}
