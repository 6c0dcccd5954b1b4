//! SM9 digital signature (GB/T 38635.2 clause 6 and 7).

use hitls_types::CryptoError;
use hitls_utils::asn1::{Decoder, Encoder};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::ecp::{G1Point, G1_UNCOMPRESSED_BYTES};
use super::hash;
use super::key::{SignMasterPublicKey, SignPrivateKey};
use super::pairing::pair;
use super::scalar::Scalar;

/// Length of the raw `h || S` signature encoding.
pub const SM9_SIGNATURE_BYTES: usize = 32 + G1_UNCOMPRESSED_BYTES;

/// An SM9 signature `(h, S)`.
///
/// Only the structure is checked on construction: `h` is 32 bytes and `S`
/// is a 65-byte `0x04`-prefixed encoding. Range and curve checks happen in
/// [`SignMasterPublicKey::verify`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm9Signature {
    h: [u8; 32],
    s: [u8; G1_UNCOMPRESSED_BYTES],
}

impl Sm9Signature {
    /// Build from the scalar `h` (big-endian, at most 32 bytes) and the
    /// uncompressed point `S`.
    pub fn new(h: &[u8], s: &[u8]) -> Result<Self, CryptoError> {
        if h.len() > 32 || s.len() != G1_UNCOMPRESSED_BYTES || s[0] != 0x04 {
            return Err(CryptoError::InvalidArg);
        }
        let mut sig = Self {
            h: [0u8; 32],
            s: [0u8; G1_UNCOMPRESSED_BYTES],
        };
        sig.h[32 - h.len()..].copy_from_slice(h);
        sig.s.copy_from_slice(s);
        Ok(sig)
    }

    pub fn h(&self) -> &[u8; 32] {
        &self.h
    }

    pub fn s(&self) -> &[u8; G1_UNCOMPRESSED_BYTES] {
        &self.s
    }

    /// Raw `h || S`.
    pub fn to_bytes(&self) -> [u8; SM9_SIGNATURE_BYTES] {
        let mut out = [0u8; SM9_SIGNATURE_BYTES];
        out[..32].copy_from_slice(&self.h);
        out[32..].copy_from_slice(&self.s);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SM9_SIGNATURE_BYTES {
            return Err(CryptoError::InvalidArg);
        }
        Self::new(&bytes[..32], &bytes[32..])
    }

    /// `SEQUENCE { OCTET STRING h, BIT STRING S }`
    pub fn to_der(&self) -> Vec<u8> {
        let mut inner = Encoder::new();
        inner.write_octet_string(&self.h).write_bit_string(&self.s);
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        enc.finish()
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let mut outer = Decoder::new(der);
        let mut seq = outer.read_sequence()?;
        outer.finish()?;
        let h = seq.read_octet_string()?;
        let s = seq.read_bit_string()?;
        seq.finish()?;
        Self::new(h, s).map_err(|_| CryptoError::DecodeAsn1Fail)
    }
}

impl SignPrivateKey {
    /// Sign `message` (typically a digest) with fresh randomness.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Sm9Signature, CryptoError> {
        self.sign_with(message, || Scalar::random(rng))
    }

    /// Sign and return the DER `SM9Signature`.
    pub fn sign_der<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(self.sign(rng, message)?.to_der())
    }

    pub(crate) fn sign_with<F>(&self, message: &[u8], next_r: F) -> Result<Sm9Signature, CryptoError>
    where
        F: FnMut() -> Result<Scalar, CryptoError>,
    {
        self.sign_rounds(message, next_r, |message, w| hash::h2(&[message, w]))
    }

    /// Signing loop with the challenge `h = H2(M || w)` supplied by `challenge`.
    fn sign_rounds<F, H>(
        &self,
        message: &[u8],
        mut next_r: F,
        mut challenge: H,
    ) -> Result<Sm9Signature, CryptoError>
    where
        F: FnMut() -> Result<Scalar, CryptoError>,
        H: FnMut(&[u8], &[u8]) -> Result<Scalar, CryptoError>,
    {
        let g = self.require_master()?.base_point();
        loop {
            let mut r = next_r()?;
            let mut w = g.pow(&r);
            let h = challenge(message, &w.to_bytes())?;
            w.zeroize();
            let mut l = r - h;
            r.zeroize();
            if bool::from(l.is_zero()) {
                log::debug!("sm9: sign produced l = 0, retrying");
                continue;
            }
            let s = self.point().mul(&l);
            l.zeroize();
            return Sm9Signature::new(&h.to_bytes(), &s.to_uncompressed());
        }
    }
}

impl SignMasterPublicKey {
    /// Verify `sig` over `message` for the identity `uid || hid`.
    ///
    /// Structural failures (S not on the curve, h out of range) report
    /// `false` like any other mismatch.
    pub fn verify(&self, uid: &[u8], hid: u8, message: &[u8], sig: &Sm9Signature) -> bool {
        match self.verify_inner(uid, hid, message, sig) {
            Ok(valid) => valid,
            Err(e) => {
                log::debug!("sm9: signature rejected: {e}");
                false
            }
        }
    }

    /// Verify a DER `SM9Signature`.
    pub fn verify_der(&self, uid: &[u8], hid: u8, message: &[u8], der: &[u8]) -> bool {
        match Sm9Signature::from_der(der) {
            Ok(sig) => self.verify(uid, hid, message, &sig),
            Err(_) => {
                log::debug!("sm9: malformed signature encoding");
                false
            }
        }
    }

    fn verify_inner(
        &self,
        uid: &[u8],
        hid: u8,
        message: &[u8],
        sig: &Sm9Signature,
    ) -> Result<bool, CryptoError> {
        let h = Scalar::from_bytes(&sig.h).ok_or(CryptoError::Sm9InvalidScalar)?;
        if bool::from(h.is_zero()) {
            return Err(CryptoError::Sm9InvalidScalar);
        }
        let s = G1Point::from_bytes(&sig.s)?;

        let t = self.base_point().pow(&h);
        let p = self.generate_user_public_key(uid, hid)?;
        let w = pair(&s, &p).mul(&t);
        let h2 = hash::h2(&[message, &w.to_bytes()])?;
        Ok(h2.to_bytes().ct_eq(&sig.h).into())
    }
}
