//! Algorithm traits shared across the crate.
//!
//! The SM9 encryption modes reach their block cipher through
//! [`BlockCipher`] trait objects, so SM4 and AES plug in interchangeably.
//! SM9 hashing (H1, H2, C3, key-exchange confirmations) goes through
//! [`Digest`].

use hitls_types::CryptoError;

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash and write the digest to `out`.
    /// `out` must hold at least the full digest.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;
}

/// A 128-bit block cipher (SM4 or AES).
pub trait BlockCipher: Send + Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypt a single block in-place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;

    /// Decrypt a single block in-place.
    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;
}
