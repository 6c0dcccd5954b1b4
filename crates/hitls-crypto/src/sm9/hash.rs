//! SM9 hash functions H1, H2, the SM3 KDF and hash-to-base.
//!
//! H1 and H2 map arbitrary data to a scalar in [1, N-1]: two SM3 blocks
//! `SM3(prefix || data || ct)` for ct = 1, 2 give 64 bytes, of which the
//! leading 40 (hlen = 8 * ceil(5 * log2(N) / 32) bits) are reduced.

use hkdf::Hkdf;
use hitls_types::CryptoError;
use sha2::Sha256;

use super::fp::Fp;
use super::scalar::Scalar;
use crate::provider::Digest;
use crate::sm3::{sm3_kdf, Sm3, SM3_OUTPUT_SIZE};

const H1_PREFIX: u8 = 0x01;
const H2_PREFIX: u8 = 0x02;
const HLEN: usize = 40;

fn absorb(ctx: &mut dyn Digest, parts: &[&[u8]]) -> Result<(), CryptoError> {
    parts.iter().try_for_each(|part| ctx.update(part))
}

fn squeeze(ctx: &mut dyn Digest) -> Result<[u8; SM3_OUTPUT_SIZE], CryptoError> {
    let mut out = [0u8; SM3_OUTPUT_SIZE];
    ctx.finish(&mut out)?;
    Ok(out)
}

/// SM3 over the concatenation of `parts`.
pub(crate) fn sm3(parts: &[&[u8]]) -> Result<[u8; SM3_OUTPUT_SIZE], CryptoError> {
    let mut ctx = Sm3::new();
    absorb(&mut ctx, parts)?;
    squeeze(&mut ctx)
}

fn hash_to_range(prefix: u8, parts: &[&[u8]]) -> Result<Scalar, CryptoError> {
    let mut base = Sm3::new();
    absorb(&mut base, &[&[prefix]])?;
    absorb(&mut base, parts)?;
    let mut buf = [0u8; 64];
    for (ct, chunk) in (1u32..).zip(buf.chunks_exact_mut(SM3_OUTPUT_SIZE)) {
        let mut ctx = base.clone();
        absorb(&mut ctx, &[&ct.to_be_bytes()])?;
        chunk.copy_from_slice(&squeeze(&mut ctx)?);
    }
    Ok(Scalar::from_hash(&buf[..HLEN]))
}

/// H1(uid || hid).
pub fn h1(uid: &[u8], hid: u8) -> Result<Scalar, CryptoError> {
    hash_to_range(H1_PREFIX, &[uid, &[hid]])
}

/// H2 over the concatenation of `parts` (message || w in the protocols).
pub fn h2(parts: &[&[u8]]) -> Result<Scalar, CryptoError> {
    hash_to_range(H2_PREFIX, parts)
}

/// KDF(Z, klen) over the concatenation of `parts`.
pub(crate) fn kdf(parts: &[&[u8]], klen: usize) -> Result<Vec<u8>, CryptoError> {
    sm3_kdf(parts, klen)
}

/// Hash `msg` to a base-field element with domain separation tag `dst`.
///
/// 48 bytes of HKDF-SHA256 output (IKM = msg, salt = dst,
/// info = "H2C" || 0x00 || 0x01) are reduced modulo p; the result is
/// returned as a 32-byte big-endian integer.
pub fn hash_to_base(msg: &[u8], dst: &[u8]) -> Result<[u8; 32], CryptoError> {
    Ok(hash_to_fp(msg, dst)?.to_bytes())
}

pub(crate) fn hash_to_fp(msg: &[u8], dst: &[u8]) -> Result<Fp, CryptoError> {
    const INFO: [u8; 5] = [b'H', b'2', b'C', 0x00, 0x01];
    let mut okm = [0u8; 48];
    Hkdf::<Sha256>::new(Some(dst), msg)
        .expand(&INFO, &mut okm)
        .map_err(|_| CryptoError::InvalidArg)?;
    Ok(Fp::from_bytes_wide(&okm))
}
