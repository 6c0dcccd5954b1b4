//! ASN.1 DER decoder.

use super::{tags, Tag, Tlv};
use hitls_types::CryptoError;

/// A streaming ASN.1 DER decoder.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining undecoded bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Require that every byte has been consumed.
    pub fn finish(&self) -> Result<(), CryptoError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CryptoError::DecodeTrailingData)
        }
    }

    /// Parse the next TLV element.
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, CryptoError> {
        let tag = self.peek_tag()?;
        self.pos += 1;

        let length = self.read_length()?;
        let end = self
            .pos
            .checked_add(length)
            .filter(|&end| end <= self.data.len())
            .ok_or(CryptoError::DecodeAsn1Fail)?;

        let value = &self.data[self.pos..end];
        self.pos = end;
        Ok(Tlv { tag, value })
    }

    /// Parse a DER length. Indefinite and non-minimal forms are rejected.
    fn read_length(&mut self) -> Result<usize, CryptoError> {
        let first = *self
            .data
            .get(self.pos)
            .ok_or(CryptoError::DecodeAsn1Fail)?;
        self.pos += 1;

        if first < 0x80 {
            return Ok(first as usize);
        }
        let num_bytes = (first & 0x7F) as usize;
        if num_bytes == 0 || num_bytes > 4 || self.pos + num_bytes > self.data.len() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let bytes = &self.data[self.pos..self.pos + num_bytes];
        if bytes[0] == 0 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let length = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
        if length < 0x80 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        self.pos += num_bytes;
        Ok(length)
    }

    fn read_expected(&mut self, tag: u8) -> Result<&'a [u8], CryptoError> {
        if self.peek_tag()?.to_byte() != tag {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(self.read_tlv()?.value)
    }

    /// Read a non-negative INTEGER and return its magnitude with the sign
    /// octet stripped. Negative and non-minimal encodings are rejected.
    pub fn read_integer(&mut self) -> Result<&'a [u8], CryptoError> {
        let value = self.read_expected(tags::INTEGER)?;
        match value {
            [] => Err(CryptoError::DecodeAsn1Fail),
            [b, ..] if b & 0x80 != 0 => Err(CryptoError::DecodeAsn1Fail),
            [0, b, ..] if b & 0x80 == 0 => Err(CryptoError::DecodeAsn1Fail),
            [0, rest @ ..] if !rest.is_empty() => Ok(rest),
            _ => Ok(value),
        }
    }

    /// Read a small non-negative INTEGER.
    pub fn read_u64(&mut self) -> Result<u64, CryptoError> {
        let mag = self.read_integer()?;
        if mag.len() > 8 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(mag.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<&'a [u8], CryptoError> {
        self.read_expected(tags::OCTET_STRING)
    }

    /// Read a byte-aligned BIT STRING (zero unused bits) and return its data.
    pub fn read_bit_string(&mut self) -> Result<&'a [u8], CryptoError> {
        match self.read_expected(tags::BIT_STRING)? {
            [0, data @ ..] => Ok(data),
            _ => Err(CryptoError::DecodeAsn1Fail),
        }
    }

    /// Read a SEQUENCE, returning a sub-decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder<'a>, CryptoError> {
        Ok(Decoder::new(self.read_expected(tags::SEQUENCE)?))
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<Tag, CryptoError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(CryptoError::DecodeAsn1Fail)?;
        Tag::from_byte(b)
    }
}
