//! Single-byte tag identifiers.

use super::{Tag, TagClass};
use hitls_types::CryptoError;

impl Tag {
    /// Parse the identifier octet. High tag numbers (low five bits all set)
    /// never occur in the structures handled here and are rejected.
    pub fn from_byte(b: u8) -> Result<Self, CryptoError> {
        if b & 0x1F == 0x1F {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let class = match b >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        };
        Ok(Tag {
            class,
            constructed: b & 0x20 != 0,
            number: b & 0x1F,
        })
    }

    /// Encode back to the identifier octet.
    pub fn to_byte(self) -> u8 {
        let class = match self.class {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        };
        class | if self.constructed { 0x20 } else { 0 } | self.number
    }
}
