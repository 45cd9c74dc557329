//! ASN.1 DER decoder.

use super::{tags, StringKind, Tag, TagClass, Tlv};
use reqkit_types::DerError;

/// A streaming ASN.1 DER decoder.
///
/// The decoder is the parse cursor: every read advances `position()` past
/// the element it consumed, so sub-parsers can be chained over one buffer.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a decoder over `data` whose cursor starts at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current cursor offset into the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining undecoded bytes.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Fail with `TruncatedInput` unless `n` more bytes are available.
    pub fn ensure_available(&self, n: usize) -> Result<(), DerError> {
        let available = self.remaining().len();
        if n > available {
            return Err(DerError::TruncatedInput { need: n, available });
        }
        Ok(())
    }

    /// A decoder over the next `len` bytes only. Positions stay relative to
    /// the same underlying buffer; this decoder does not move.
    pub fn limit(&self, len: usize) -> Result<Decoder<'a>, DerError> {
        self.ensure_available(len)?;
        let end = (self.pos + len).min(self.data.len());
        Ok(Decoder {
            data: &self.data[..end],
            pos: self.pos,
        })
    }

    /// Advance the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DerError> {
        self.ensure_available(n)?;
        self.pos += n;
        Ok(())
    }

    /// Validate that the identifier octet at the cursor is `expected` and step past it.
    pub fn expect_tag(&mut self, expected: u8) -> Result<(), DerError> {
        self.ensure_available(1)?;
        let found = self.data[self.pos];
        if found != expected {
            return Err(DerError::UnexpectedTag { expected, found });
        }
        self.pos += 1;
        Ok(())
    }

    /// Parse a DER length field at the cursor.
    ///
    /// Returns the decoded content length and the number of octets the
    /// length field itself occupied.
    pub fn read_length(&mut self) -> Result<(usize, usize), DerError> {
        self.ensure_available(1)?;
        let first = self.data[self.pos];
        self.pos += 1;

        if first < 0x80 {
            return Ok((first as usize, 1));
        }
        // 0x80 is the BER indefinite form, never valid in DER
        let num_bytes = (first & 0x7F) as usize;
        if num_bytes == 0 || num_bytes > 4 {
            return Err(DerError::MalformedLength);
        }
        self.ensure_available(num_bytes)?;
        let bytes = &self.data[self.pos..self.pos + num_bytes];
        if bytes[0] == 0 {
            return Err(DerError::MalformedLength);
        }
        let length = bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        if length < 0x80 {
            return Err(DerError::MalformedLength);
        }
        self.pos += num_bytes;
        Ok((length, 1 + num_bytes))
    }

    /// Parse the next TLV element.
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, DerError> {
        let start = self.pos;
        let (tag, tag_len) = Tag::from_bytes(self.remaining())?;
        self.pos += tag_len;

        let (length, _) = self.read_length()?;
        self.ensure_available(length)?;

        let value = &self.data[self.pos..self.pos + length];
        self.pos += length;

        Ok(Tlv {
            tag,
            value,
            encoded_len: self.pos - start,
        })
    }

    /// Read an element whose identifier octet must equal `tag`, returning its content.
    pub fn read_expected(&mut self, tag: u8) -> Result<&'a [u8], DerError> {
        self.expect_tag(tag)?;
        let (length, _) = self.read_length()?;
        self.ensure_available(length)?;
        let value = &self.data[self.pos..self.pos + length];
        self.pos += length;
        Ok(value)
    }

    /// Read an INTEGER and return its bytes (big-endian, may include leading zero).
    pub fn read_integer(&mut self) -> Result<&'a [u8], DerError> {
        let value = self.read_expected(tags::INTEGER)?;
        if value.is_empty() {
            return Err(DerError::MalformedLength);
        }
        Ok(value)
    }

    /// Read a BIT STRING and return (unused_bits, data).
    pub fn read_bit_string(&mut self) -> Result<(u8, &'a [u8]), DerError> {
        let value = self.read_expected(tags::BIT_STRING)?;
        match value.split_first() {
            Some((&unused, data)) if unused < 8 => Ok((unused, data)),
            _ => Err(DerError::MalformedLength),
        }
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<(), DerError> {
        if !self.read_expected(tags::NULL)?.is_empty() {
            return Err(DerError::MalformedLength);
        }
        Ok(())
    }

    /// Read an OID and return the raw bytes.
    pub fn read_oid(&mut self) -> Result<&'a [u8], DerError> {
        self.read_expected(tags::OID)
    }

    /// Read a SEQUENCE, returning a sub-decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder<'a>, DerError> {
        Ok(Decoder::new(self.read_expected(tags::SEQUENCE)?))
    }

    /// Read a SET, returning a sub-decoder over its contents.
    pub fn read_set(&mut self) -> Result<Decoder<'a>, DerError> {
        Ok(Decoder::new(self.read_expected(tags::SET)?))
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<Tag, DerError> {
        let (tag, _) = Tag::from_bytes(self.remaining())?;
        Ok(tag)
    }

    /// Try to read a context-specific tagged value. Returns `None` if
    /// the next tag does not match, without consuming any bytes.
    pub fn try_read_context_specific(
        &mut self,
        tag_num: u32,
        constructed: bool,
    ) -> Result<Option<Tlv<'a>>, DerError> {
        if self.is_empty() {
            return Ok(None);
        }
        let tag = self.peek_tag()?;
        if tag.class == TagClass::ContextSpecific
            && tag.number == tag_num
            && tag.constructed == constructed
        {
            Ok(Some(self.read_tlv()?))
        } else {
            Ok(None)
        }
    }

    /// Read a UTF8String, PrintableString or IA5String, returning its kind and value.
    pub fn read_string(&mut self) -> Result<(StringKind, String), DerError> {
        self.ensure_available(1)?;
        let found = self.data[self.pos];
        let kind = StringKind::from_tag(found).ok_or(DerError::UnexpectedTag {
            expected: tags::UTF8_STRING,
            found,
        })?;
        let value = self.read_expected(found)?;
        Ok((kind, kind.decode(value)?))
    }
}
