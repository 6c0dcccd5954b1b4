/// Block cipher identifiers usable beneath the SM9 encryption modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymCipherId {
    Sm4,
    Aes128,
    Aes192,
    Aes256,
}

impl SymCipherId {
    /// Key length in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::Sm4 | Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Block length in bytes (16 for every supported cipher).
    pub fn block_size(self) -> usize {
        16
    }
}

/// SM9 public-key encryption mode, as carried in the `encType` field of
/// the `SM9Cipher` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sm9EncType {
    Xor = 0,
    Ecb = 1,
    Cbc = 2,
    Ofb = 4,
    Cfb = 8,
}

impl Sm9EncType {
    /// Map the wire value back to a mode.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Xor),
            1 => Some(Self::Ecb),
            2 => Some(Self::Cbc),
            4 => Some(Self::Ofb),
            8 => Some(Self::Cfb),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// SM9 hash identifier bytes (`hid`) from GB/T 38635.
pub mod sm9_hid {
    /// User keys used for signing.
    pub const SIGN: u8 = 0x01;
    /// User keys used for key exchange.
    pub const EXCHANGE: u8 = 0x02;
    /// User keys used for encryption and key encapsulation.
    pub const ENCRYPT: u8 = 0x03;
}
