//! Block cipher modes of operation.
//!
//! This module provides ECB, CBC, CFB-128 and OFB over any block cipher
//! reachable through the [`BlockCipher`](crate::provider::BlockCipher)
//! trait, plus PKCS#7 padding for the block-aligned modes.

pub mod cbc;
pub mod cfb;
pub mod ecb;
pub mod ofb;

use hitls_types::CryptoError;
use subtle::{ConstantTimeEq, ConstantTimeLess};

/// Append PKCS#7 padding; always adds between 1 and `block_size` bytes.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#7 padding in place.
///
/// The padding bytes are checked without data-dependent branches; only the
/// final accept/reject decision is observable.
pub fn pkcs7_unpad(data: &mut Vec<u8>, block_size: usize) -> Result<(), CryptoError> {
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(CryptoError::InvalidPadding);
    }
    let pad = data[data.len() - 1];
    let mut valid = !pad.ct_eq(&0) & !(block_size as u8).ct_lt(&pad);
    let tail = &data[data.len() - block_size..];
    for (i, &b) in tail.iter().rev().enumerate() {
        let in_pad = (i as u8).ct_lt(&pad);
        valid &= !in_pad | b.ct_eq(&pad);
    }
    if !bool::from(valid) {
        return Err(CryptoError::InvalidPadding);
    }
    data.truncate(data.len() - pad as usize);
    Ok(())
}

pub(crate) fn check_block_multiple(len: usize, block_size: usize) -> Result<(), CryptoError> {
    if len == 0 || len % block_size != 0 {
        return Err(CryptoError::InvalidBlockLength);
    }
    Ok(())
}

pub(crate) fn check_iv(iv: &[u8], block_size: usize) -> Result<(), CryptoError> {
    if iv.len() != block_size {
        return Err(CryptoError::InvalidIvLength);
    }
    Ok(())
}
