//! ECB (Electronic Codebook) mode of operation.
//!
//! **Security warning**: ECB mode does not provide semantic security and
//! should generally not be used. It is provided for completeness and
//! specific low-level use cases only.

use hitls_types::CryptoError;

use super::check_block_multiple;
use crate::provider::BlockCipher;

/// Encrypt data using ECB mode. Input must be a non-empty multiple of the
/// block size (no padding).
pub fn ecb_encrypt(cipher: &dyn BlockCipher, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let bs = cipher.block_size();
    check_block_multiple(plaintext.len(), bs)?;
    let mut output = plaintext.to_vec();
    for chunk in output.chunks_mut(bs) {
        cipher.encrypt_block(chunk)?;
    }
    Ok(output)
}

/// Decrypt data using ECB mode.
pub fn ecb_decrypt(cipher: &dyn BlockCipher, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let bs = cipher.block_size();
    check_block_multiple(ciphertext.len(), bs)?;
    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_mut(bs) {
        cipher.decrypt_block(chunk)?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::AesKey;
    use crate::modes::test_util::hex;
    use crate::sm4::Sm4Key;

    // NIST SP 800-38A F.1.1: AES-128 ECB
    #[test]
    fn test_ecb_aes128() {
        let key = AesKey::new(&hex("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
        let pt = hex("6bc1bee22e409f96e93d7e117393172a");
        let ct = ecb_encrypt(&key, &pt).unwrap();
        assert_eq!(ct, hex("3ad77bb40d7a3660a89ecaf32466ef97"));
        assert_eq!(ecb_decrypt(&key, &ct).unwrap(), pt);
    }

    #[test]
    fn test_ecb_sm4_multi_block() {
        let key = Sm4Key::new(&hex("0123456789abcdeffedcba9876543210")).unwrap();
        let pt = hex("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210");
        let ct = ecb_encrypt(&key, &pt).unwrap();
        assert_eq!(&ct[..16], &hex("681edf34d206965e86b3e94f536e4246")[..]);
        assert_eq!(&ct[..16], &ct[16..]);
        assert_eq!(ecb_decrypt(&key, &ct).unwrap(), pt);
    }

    #[test]
    fn test_ecb_invalid_length() {
        let key = Sm4Key::new(&[0u8; 16]).unwrap();
        assert!(ecb_encrypt(&key, &[0u8; 15]).is_err());
        assert!(ecb_encrypt(&key, &[]).is_err());
        assert!(ecb_decrypt(&key, &[0u8; 17]).is_err());
    }
}
