//! ASN.1 DER encoder.

use super::tags;

/// A builder for constructing DER-encoded ASN.1 data.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Consume the encoder and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Write a raw TLV with the given tag byte and value.
    pub fn write_tlv(&mut self, tag: u8, value: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.write_length(value.len());
        self.buf.extend_from_slice(value);
        self
    }

    /// Write a minimal DER length.
    fn write_length(&mut self, length: usize) {
        if length < 0x80 {
            self.buf.push(length as u8);
            return;
        }
        let bytes = length.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        self.buf.push(0x80 | (bytes.len() - skip) as u8);
        self.buf.extend_from_slice(&bytes[skip..]);
    }

    /// Write a non-negative INTEGER from big-endian magnitude bytes.
    /// Leading zeros are dropped and a sign octet is added when needed.
    pub fn write_integer(&mut self, magnitude: &[u8]) -> &mut Self {
        let skip = magnitude.iter().take_while(|&&b| b == 0).count();
        let trimmed = &magnitude[skip..];
        match trimmed.first() {
            None => self.write_tlv(tags::INTEGER, &[0x00]),
            Some(b) if b & 0x80 != 0 => {
                let mut padded = Vec::with_capacity(trimmed.len() + 1);
                padded.push(0x00);
                padded.extend_from_slice(trimmed);
                self.write_tlv(tags::INTEGER, &padded)
            }
            Some(_) => self.write_tlv(tags::INTEGER, trimmed),
        }
    }

    /// Write a small non-negative INTEGER.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_integer(&value.to_be_bytes())
    }

    /// Write an OCTET STRING.
    pub fn write_octet_string(&mut self, value: &[u8]) -> &mut Self {
        self.write_tlv(tags::OCTET_STRING, value)
    }

    /// Write a byte-aligned BIT STRING.
    pub fn write_bit_string(&mut self, value: &[u8]) -> &mut Self {
        let mut content = Vec::with_capacity(value.len() + 1);
        content.push(0x00);
        content.extend_from_slice(value);
        self.write_tlv(tags::BIT_STRING, &content)
    }

    /// Write a SEQUENCE wrapping the given contents.
    pub fn write_sequence(&mut self, contents: &[u8]) -> &mut Self {
        self.write_tlv(tags::SEQUENCE, contents)
    }
}
