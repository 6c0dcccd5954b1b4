//! CBC (Cipher Block Chaining) mode of operation.

use hitls_types::CryptoError;

use super::{check_block_multiple, check_iv};
use crate::provider::BlockCipher;

/// Encrypt block-aligned data using CBC mode. Padding is the caller's job.
pub fn cbc_encrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let bs = cipher.block_size();
    check_iv(iv, bs)?;
    check_block_multiple(plaintext.len(), bs)?;

    let mut data = plaintext.to_vec();
    let mut prev = iv.to_vec();
    for chunk in data.chunks_mut(bs) {
        for (c, p) in chunk.iter_mut().zip(&prev) {
            *c ^= p;
        }
        cipher.encrypt_block(chunk)?;
        prev.copy_from_slice(chunk);
    }
    Ok(data)
}

/// Decrypt block-aligned data using CBC mode.
pub fn cbc_decrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let bs = cipher.block_size();
    check_iv(iv, bs)?;
    check_block_multiple(ciphertext.len(), bs)?;

    let mut output = ciphertext.to_vec();
    for (i, chunk) in output.chunks_mut(bs).enumerate() {
        cipher.decrypt_block(chunk)?;
        let prev = if i == 0 {
            iv
        } else {
            &ciphertext[(i - 1) * bs..i * bs]
        };
        for (c, p) in chunk.iter_mut().zip(prev) {
            *c ^= p;
        }
    }
    Ok(output)
}
