//! OFB (Output Feedback) mode of operation.

use hitls_types::CryptoError;

use super::check_iv;
use crate::provider::BlockCipher;

/// Encrypt or decrypt data in place using OFB mode (symmetric operation).
pub fn ofb_crypt(cipher: &dyn BlockCipher, iv: &[u8], data: &mut [u8]) -> Result<(), CryptoError> {
    let bs = cipher.block_size();
    check_iv(iv, bs)?;

    let mut keystream = iv.to_vec();
    for chunk in data.chunks_mut(bs) {
        cipher.encrypt_block(&mut keystream)?;
        for (d, k) in chunk.iter_mut().zip(&keystream) {
            *d ^= k;
        }
    }
    Ok(())
}
