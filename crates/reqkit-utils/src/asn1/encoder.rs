//! ASN.1 DER encoder.

/// Output buffer for DER identifier, length and content octets.
///
/// Content encoding lives in [`super::Node`]; the encoder only frames it.
#[derive(Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

/// Number of octets a DER length field for `length` occupies.
pub fn length_octets(length: usize) -> usize {
    if length < 0x80 {
        1
    } else {
        1 + significant_bytes(length)
    }
}

fn significant_bytes(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()).div_ceil(8) as usize
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Consume the encoder and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Write a complete TLV with the given identifier octet.
    pub fn write_tlv(&mut self, tag: u8, value: &[u8]) -> &mut Self {
        self.write_header(tag, value.len()).write_raw(value)
    }

    /// Write only the identifier and length octets; the caller writes
    /// exactly `length` content bytes afterwards.
    pub fn write_header(&mut self, tag: u8, length: usize) -> &mut Self {
        self.buf.push(tag);
        if length < 0x80 {
            self.buf.push(length as u8);
        } else {
            let n = significant_bytes(length);
            self.buf.push(0x80 | n as u8);
            self.buf
                .extend_from_slice(&length.to_be_bytes()[std::mem::size_of::<usize>() - n..]);
        }
        self
    }

    /// Append already-encoded bytes.
    pub fn write_raw(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }
}
