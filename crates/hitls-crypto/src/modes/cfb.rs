//! CFB (Cipher Feedback) mode of operation.
//!
//! Implements CFB-128 as defined in NIST SP 800-38A §6.3. A trailing
//! partial block is handled by truncating the last keystream block, so any
//! length is accepted.

use hitls_types::CryptoError;

use super::check_iv;
use crate::provider::BlockCipher;

fn cfb_crypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    input: &[u8],
    decrypt: bool,
) -> Result<Vec<u8>, CryptoError> {
    let bs = cipher.block_size();
    check_iv(iv, bs)?;

    let mut output = Vec::with_capacity(input.len());
    let mut feedback = iv.to_vec();
    for chunk in input.chunks(bs) {
        let mut keystream = feedback.clone();
        cipher.encrypt_block(&mut keystream)?;
        let start = output.len();
        output.extend(chunk.iter().zip(&keystream).map(|(x, k)| x ^ k));
        let ct = if decrypt { chunk } else { &output[start..] };
        feedback[..ct.len()].copy_from_slice(ct);
    }
    Ok(output)
}

/// Encrypt data using CFB-128 mode.
pub fn cfb_encrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    cfb_crypt(cipher, iv, plaintext, false)
}

/// Decrypt data using CFB-128 mode.
pub fn cfb_decrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    cfb_crypt(cipher, iv, ciphertext, true)
}
