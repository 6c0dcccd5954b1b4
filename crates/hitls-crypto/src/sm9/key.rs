//! SM9 master and user keys.
//!
//! The signature scheme keeps its master public key in G2 and issues user
//! keys in G1; the encryption scheme (also used for key exchange) swaps the
//! two groups. Each master public key lazily caches its pairing base point,
//! `e(P1, Ppub)` for signing and `e(Ppub, P2)` for encryption.

use std::sync::OnceLock;

use hitls_types::CryptoError;
use hitls_utils::asn1::{tags, Decoder, Encoder};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::ecp::G1Point;
use super::ecp2::G2Point;
use super::gt::Gt;
use super::hash;
use super::pairing::pair;
use super::scalar::Scalar;

/// t2 = d / (H1(uid || hid) + d).
fn user_key_scalar(d: &Scalar, uid: &[u8], hid: u8) -> Result<Scalar, CryptoError> {
    let t1 = hash::h1(uid, hid)? + *d;
    if bool::from(t1.is_zero()) {
        log::debug!("sm9: H1(uid || hid) + d = 0, master key must be regenerated");
        return Err(CryptoError::Sm9RegenerateMasterKey);
    }
    let mut inv = t1.invert();
    let t2 = *d * inv;
    inv.zeroize();
    Ok(t2)
}

fn master_scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, CryptoError> {
    let d = Scalar::from_be_slice(bytes).ok_or(CryptoError::Sm9InvalidScalar)?;
    if bool::from(d.is_zero()) {
        return Err(CryptoError::Sm9InvalidScalar);
    }
    Ok(d)
}

fn bit_string_der(bytes: &[u8]) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_bit_string(bytes);
    enc.finish()
}

/// `INTEGER d` or `SEQUENCE { INTEGER d, BIT STRING pub OPTIONAL }`.
fn decode_master_private(der: &[u8]) -> Result<(Vec<u8>, Option<&[u8]>), CryptoError> {
    let mut outer = Decoder::new(der);
    let (d, public) = if outer.peek_tag()?.to_byte() == tags::SEQUENCE {
        let mut seq = outer.read_sequence()?;
        let d = seq.read_integer()?;
        let public = if seq.is_empty() {
            None
        } else {
            Some(seq.read_bit_string()?)
        };
        seq.finish()?;
        (d, public)
    } else {
        (outer.read_integer()?, None)
    };
    outer.finish()?;
    Ok((d.to_vec(), public))
}

/// An embedded master public key must be the one derived from `d`.
fn check_embedded_public<P: PartialEq>(derived: &P, embedded: Option<P>) -> Result<(), CryptoError> {
    match embedded {
        Some(public) if public != *derived => {
            log::debug!("sm9: embedded master public key does not match d");
            Err(CryptoError::InvalidKey)
        }
        _ => Ok(()),
    }
}

/// `BIT STRING pub` or `SEQUENCE { BIT STRING pub }`.
fn decode_master_public(der: &[u8]) -> Result<&[u8], CryptoError> {
    let mut outer = Decoder::new(der);
    let bytes = if outer.peek_tag()?.to_byte() == tags::SEQUENCE {
        let mut seq = outer.read_sequence()?;
        let bytes = seq.read_bit_string()?;
        seq.finish()?;
        bytes
    } else {
        outer.read_bit_string()?
    };
    outer.finish()?;
    Ok(bytes)
}

/// `BIT STRING key` or `SEQUENCE { BIT STRING key, BIT STRING masterPub OPTIONAL }`.
fn decode_user_private(der: &[u8]) -> Result<(&[u8], Option<&[u8]>), CryptoError> {
    let mut outer = Decoder::new(der);
    let parts = if outer.peek_tag()?.to_byte() == tags::SEQUENCE {
        let mut seq = outer.read_sequence()?;
        let key = seq.read_bit_string()?;
        let master = if seq.is_empty() {
            None
        } else {
            Some(seq.read_bit_string()?)
        };
        seq.finish()?;
        (key, master)
    } else {
        (outer.read_bit_string()?, None)
    };
    outer.finish()?;
    Ok(parts)
}

fn user_private_der(key: &[u8], master: Option<&[u8]>) -> Vec<u8> {
    match master {
        None => bit_string_der(key),
        Some(master) => {
            let mut inner = Encoder::new();
            inner.write_bit_string(key).write_bit_string(master);
            let mut enc = Encoder::new();
            enc.write_sequence(&inner.finish());
            enc.finish()
        }
    }
}

// ---------------------------------------------------------------------------
// Signature keys
// ---------------------------------------------------------------------------

/// Signature master public key `Ppub-s = [ks]P2`.
#[derive(Clone, Debug)]
pub struct SignMasterPublicKey {
    point: G2Point,
    base: OnceLock<Gt>,
}

impl SignMasterPublicKey {
    fn from_point(point: G2Point) -> Result<Self, CryptoError> {
        if point.is_identity() {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(Self {
            point,
            base: OnceLock::new(),
        })
    }

    /// The master public point.
    pub fn point(&self) -> &G2Point {
        &self.point
    }

    /// g = e(P1, Ppub-s), computed on first use.
    pub fn base_point(&self) -> &Gt {
        self.base.get_or_init(|| {
            log::trace!("sm9: computing signature base point e(P1, Ppub)");
            pair(&G1Point::generator(), &self.point)
        })
    }

    /// `[H1(uid || hid)]P2 + Ppub-s`, the signer's public point.
    pub fn generate_user_public_key(&self, uid: &[u8], hid: u8) -> Result<G2Point, CryptoError> {
        let h = hash::h1(uid, hid)?;
        Ok(G2Point::mul_base(&h).add(&self.point))
    }

    /// Decode a 129-byte uncompressed or 65-byte compressed point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_point(G2Point::from_bytes(bytes)?)
    }

    pub fn to_bytes(&self) -> [u8; 129] {
        self.point.to_uncompressed()
    }

    pub fn to_compressed(&self) -> [u8; 65] {
        self.point.to_compressed()
    }

    /// DER BIT STRING of the uncompressed point.
    pub fn to_der(&self) -> Vec<u8> {
        bit_string_der(&self.to_bytes())
    }

    /// DER BIT STRING of the compressed point.
    pub fn to_der_compressed(&self) -> Vec<u8> {
        bit_string_der(&self.to_compressed())
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(decode_master_public(der)?)
    }
}

impl PartialEq for SignMasterPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for SignMasterPublicKey {}

/// Signature master private key `ks`, held by the key generation center.
#[derive(Clone, Debug)]
pub struct SignMasterPrivateKey {
    d: Scalar,
    public: SignMasterPublicKey,
}

impl SignMasterPrivateKey {
    /// Generate a fresh master key pair.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        Self::from_scalar(Scalar::random(rng)?)
    }

    fn from_scalar(d: Scalar) -> Result<Self, CryptoError> {
        let public = SignMasterPublicKey::from_point(G2Point::mul_base(&d))?;
        Ok(Self { d, public })
    }

    /// Build from a big-endian scalar in [1, N-1] (at most 32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_scalar(master_scalar_from_bytes(bytes)?)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.d.to_bytes()
    }

    pub fn public_key(&self) -> &SignMasterPublicKey {
        &self.public
    }

    /// Issue the signing key `[ks / (H1(uid || hid) + ks)]P1`.
    pub fn generate_user_key(&self, uid: &[u8], hid: u8) -> Result<SignPrivateKey, CryptoError> {
        let mut t2 = user_key_scalar(&self.d, uid, hid)?;
        let point = G1Point::mul_base(&t2);
        t2.zeroize();
        Ok(SignPrivateKey {
            point,
            master: Some(self.public.clone()),
        })
    }

    /// DER INTEGER.
    pub fn to_der(&self) -> Vec<u8> {
        let mut bytes = self.d.to_bytes();
        let mut enc = Encoder::new();
        enc.write_integer(&bytes);
        bytes.zeroize();
        enc.finish()
    }

    /// Accepts `INTEGER d` or `SEQUENCE { INTEGER d, BIT STRING pub }`; an
    /// embedded public key that is not `[d]P2` is rejected.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (mut d, public) = decode_master_private(der)?;
        let key = Self::from_bytes(&d);
        d.zeroize();
        let key = key?;
        let embedded = public.map(SignMasterPublicKey::from_bytes).transpose()?;
        check_embedded_public(&key.public, embedded)?;
        Ok(key)
    }
}

impl PartialEq for SignMasterPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.d.ct_eq(&other.d).into()
    }
}

impl Eq for SignMasterPrivateKey {}

impl Drop for SignMasterPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

/// A user's signing key in G1.
///
/// Keys decoded without an embedded master public key must have one
/// attached with [`set_master_public_key`](Self::set_master_public_key)
/// before signing.
#[derive(Clone)]
pub struct SignPrivateKey {
    point: G1Point,
    master: Option<SignMasterPublicKey>,
}

impl SignPrivateKey {
    pub(crate) fn point(&self) -> &G1Point {
        &self.point
    }

    pub fn master_public_key(&self) -> Option<&SignMasterPublicKey> {
        self.master.as_ref()
    }

    pub fn set_master_public_key(&mut self, master: SignMasterPublicKey) {
        self.master = Some(master);
    }

    pub(crate) fn require_master(&self) -> Result<&SignMasterPublicKey, CryptoError> {
        self.master.as_ref().ok_or(CryptoError::InvalidKey)
    }

    /// Decode a 65-byte uncompressed or 33-byte compressed G1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let point = G1Point::from_bytes(bytes)?;
        if point.is_identity() {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(Self {
            point,
            master: None,
        })
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        self.point.to_uncompressed()
    }

    /// DER BIT STRING of the uncompressed point.
    pub fn to_der(&self) -> Vec<u8> {
        user_private_der(&self.to_bytes(), None)
    }

    /// `SEQUENCE { BIT STRING key, BIT STRING masterPub }`.
    pub fn to_der_with_master(&self) -> Result<Vec<u8>, CryptoError> {
        let master = self.require_master()?.to_bytes();
        Ok(user_private_der(&self.to_bytes(), Some(&master)))
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (key, master) = decode_user_private(der)?;
        let mut priv_key = Self::from_bytes(key)?;
        if let Some(master) = master {
            priv_key.master = Some(SignMasterPublicKey::from_bytes(master)?);
        }
        Ok(priv_key)
    }
}

impl PartialEq for SignPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes()).into()
    }
}

impl Eq for SignPrivateKey {}

impl core::fmt::Debug for SignPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignPrivateKey").finish_non_exhaustive()
    }
}

impl Drop for SignPrivateKey {
    fn drop(&mut self) {
        self.point.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Encryption keys
// ---------------------------------------------------------------------------

/// Encryption master public key `Ppub-e = [ke]P1`.
#[derive(Clone, Debug)]
pub struct EncryptMasterPublicKey {
    point: G1Point,
    base: OnceLock<Gt>,
}

impl EncryptMasterPublicKey {
    fn from_point(point: G1Point) -> Result<Self, CryptoError> {
        if point.is_identity() {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(Self {
            point,
            base: OnceLock::new(),
        })
    }

    pub fn point(&self) -> &G1Point {
        &self.point
    }

    /// g = e(Ppub-e, P2), computed on first use.
    pub fn base_point(&self) -> &Gt {
        self.base.get_or_init(|| {
            log::trace!("sm9: computing encryption base point e(Ppub, P2)");
            pair(&self.point, &G2Point::generator())
        })
    }

    /// `[H1(uid || hid)]P1 + Ppub-e`, the recipient's public point.
    pub fn generate_user_public_key(&self, uid: &[u8], hid: u8) -> Result<G1Point, CryptoError> {
        let h = hash::h1(uid, hid)?;
        Ok(G1Point::mul_base(&h).add(&self.point))
    }

    /// Decode a 65-byte uncompressed or 33-byte compressed point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_point(G1Point::from_bytes(bytes)?)
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        self.point.to_uncompressed()
    }

    pub fn to_compressed(&self) -> [u8; 33] {
        self.point.to_compressed()
    }

    pub fn to_der(&self) -> Vec<u8> {
        bit_string_der(&self.to_bytes())
    }

    pub fn to_der_compressed(&self) -> Vec<u8> {
        bit_string_der(&self.to_compressed())
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        Self::from_bytes(decode_master_public(der)?)
    }
}

impl PartialEq for EncryptMasterPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for EncryptMasterPublicKey {}

/// Encryption master private key `ke`.
#[derive(Clone, Debug)]
pub struct EncryptMasterPrivateKey {
    d: Scalar,
    public: EncryptMasterPublicKey,
}

impl EncryptMasterPrivateKey {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        Self::from_scalar(Scalar::random(rng)?)
    }

    fn from_scalar(d: Scalar) -> Result<Self, CryptoError> {
        let public = EncryptMasterPublicKey::from_point(G1Point::mul_base(&d))?;
        Ok(Self { d, public })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_scalar(master_scalar_from_bytes(bytes)?)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.d.to_bytes()
    }

    pub fn public_key(&self) -> &EncryptMasterPublicKey {
        &self.public
    }

    /// Issue the decryption / key-exchange key `[ke / (H1(uid || hid) + ke)]P2`.
    pub fn generate_user_key(
        &self,
        uid: &[u8],
        hid: u8,
    ) -> Result<EncryptPrivateKey, CryptoError> {
        let mut t2 = user_key_scalar(&self.d, uid, hid)?;
        let point = G2Point::mul_base(&t2);
        t2.zeroize();
        Ok(EncryptPrivateKey {
            point,
            master: Some(self.public.clone()),
        })
    }

    pub fn to_der(&self) -> Vec<u8> {
        let mut bytes = self.d.to_bytes();
        let mut enc = Encoder::new();
        enc.write_integer(&bytes);
        bytes.zeroize();
        enc.finish()
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (mut d, public) = decode_master_private(der)?;
        let key = Self::from_bytes(&d);
        d.zeroize();
        let key = key?;
        let embedded = public.map(EncryptMasterPublicKey::from_bytes).transpose()?;
        check_embedded_public(&key.public, embedded)?;
        Ok(key)
    }
}

impl PartialEq for EncryptMasterPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.d.ct_eq(&other.d).into()
    }
}

impl Eq for EncryptMasterPrivateKey {}

impl Drop for EncryptMasterPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

/// A user's decryption key in G2, also used for key exchange.
#[derive(Clone)]
pub struct EncryptPrivateKey {
    point: G2Point,
    master: Option<EncryptMasterPublicKey>,
}

impl EncryptPrivateKey {
    pub(crate) fn point(&self) -> &G2Point {
        &self.point
    }

    pub fn master_public_key(&self) -> Option<&EncryptMasterPublicKey> {
        self.master.as_ref()
    }

    pub fn set_master_public_key(&mut self, master: EncryptMasterPublicKey) {
        self.master = Some(master);
    }

    pub(crate) fn require_master(&self) -> Result<&EncryptMasterPublicKey, CryptoError> {
        self.master.as_ref().ok_or(CryptoError::InvalidKey)
    }

    /// Decode a 129-byte uncompressed or 65-byte compressed G2 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let point = G2Point::from_bytes(bytes)?;
        if point.is_identity() {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(Self {
            point,
            master: None,
        })
    }

    pub fn to_bytes(&self) -> [u8; 129] {
        self.point.to_uncompressed()
    }

    pub fn to_der(&self) -> Vec<u8> {
        user_private_der(&self.to_bytes(), None)
    }

    pub fn to_der_with_master(&self) -> Result<Vec<u8>, CryptoError> {
        let master = self.require_master()?.to_bytes();
        Ok(user_private_der(&self.to_bytes(), Some(&master)))
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (key, master) = decode_user_private(der)?;
        let mut priv_key = Self::from_bytes(key)?;
        if let Some(master) = master {
            priv_key.master = Some(EncryptMasterPublicKey::from_bytes(master)?);
        }
        Ok(priv_key)
    }
}

impl PartialEq for EncryptPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes()).into()
    }
}

impl Eq for EncryptPrivateKey {}

impl core::fmt::Debug for EncryptPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EncryptPrivateKey").finish_non_exhaustive()
    }
}

impl Drop for EncryptPrivateKey {
    fn drop(&mut self) {
        self.point.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitls_types::algorithm::sm9_hid;
    use rand_core::OsRng;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    const SIGN_MASTER: &str = "000130E78459D78545CB54C587E02CF480CE0B66340F319F348A1D5B1F2DC5F4";
    const ENC_MASTER: &str = "0001EDEE3778F441F8DEA3D9FA0ACC4E07EE36C93F9A08618AF4AD85CEDE1C22";

    #[test]
    fn test_sign_master_public_key_vector() {
        let master = SignMasterPrivateKey::from_bytes(&hex(SIGN_MASTER)).unwrap();
        let expected = hex(concat!(
            "04",
            "9f64080b3084f733e48aff4b41b565011ce0711c5e392cfb0ab1b6791b94c408",
            "29dba116152d1f786ce843ed24a3b573414d2177386a92dd8f14d65696ea5e32",
            "69850938abea0112b57329f447e3a0cbad3e2fdb1a77f335e89e1408d0ef1c25",
            "41e00a53dda532da1a7ce027b7a46f741006e85f5cdff0730e75c05fb4e3216d",
        ));
        assert_eq!(master.public_key().to_bytes().to_vec(), expected);
    }

    #[test]
    fn test_sign_user_key_vector() {
        let master = SignMasterPrivateKey::from_bytes(&hex(SIGN_MASTER)).unwrap();
        let user = master.generate_user_key(b"Alice", sm9_hid::SIGN).unwrap();
        let expected = hex(concat!(
            "04",
            "a5702f05cf1315305e2d6eb64b0deb923db1a0bcf0caff90523ac8754aa69820",
            "78559a844411f9825c109f5ee3f52d720dd01785392a727bb1556952b2b013d3",
        ));
        assert_eq!(user.to_bytes().to_vec(), expected);
    }

    #[test]
    fn test_encrypt_master_public_key_vector() {
        let master = EncryptMasterPrivateKey::from_bytes(&hex(ENC_MASTER)).unwrap();
        let expected = hex(concat!(
            "04",
            "787ed7b8a51f3ab84e0a66003f32da5c720b17eca7137d39abc66e3c80a892ff",
            "769de61791e5adc4b9ff85a31354900b202871279a8c49dc3f220f644c57a7b1",
        ));
        assert_eq!(master.public_key().to_bytes().to_vec(), expected);
    }

    #[test]
    fn test_user_key_pairing_identity() {
        // e(dA, H1(uid || hid)P2 + Ppub) = e(P1, Ppub)
        let master = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::SIGN).unwrap();
        let pub_point = master
            .public_key()
            .generate_user_public_key(b"emmansun", sm9_hid::SIGN)
            .unwrap();
        assert_eq!(
            pair(user.point(), &pub_point),
            *master.public_key().base_point()
        );
    }

    #[test]
    fn test_rejects_zero_and_oversized_master_scalar() {
        assert_eq!(
            SignMasterPrivateKey::from_bytes(&[0u8; 32]).unwrap_err(),
            CryptoError::Sm9InvalidScalar
        );
        assert!(EncryptMasterPrivateKey::from_bytes(&[0xffu8; 32]).is_err());
        assert!(EncryptMasterPrivateKey::from_bytes(&[1u8; 33]).is_err());
    }

    #[test]
    fn test_regenerate_master_key() {
        // d = N - H1(uid || hid) makes t1 vanish.
        let h = hash::h1(b"Alice", sm9_hid::SIGN).unwrap();
        let d = Scalar::ZERO - h;
        let master = SignMasterPrivateKey::from_bytes(&d.to_bytes()).unwrap();
        assert_eq!(
            master
                .generate_user_key(b"Alice", sm9_hid::SIGN)
                .unwrap_err(),
            CryptoError::Sm9RegenerateMasterKey
        );
        assert!(master.generate_user_key(b"Bob", sm9_hid::SIGN).is_ok());
    }

    #[test]
    fn test_master_private_der_forms() {
        let master = SignMasterPrivateKey::from_bytes(&hex(SIGN_MASTER)).unwrap();
        let der = master.to_der();
        assert_eq!(der[0], tags::INTEGER);
        assert_eq!(SignMasterPrivateKey::from_der(&der).unwrap(), master);

        // SEQUENCE { INTEGER, BIT STRING }
        let mut inner = Encoder::new();
        inner
            .write_integer(&master.to_bytes())
            .write_bit_string(&master.public_key().to_bytes());
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        assert_eq!(SignMasterPrivateKey::from_der(&enc.finish()).unwrap(), master);

        // An embedded public key from another master is refused.
        let other = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let mut inner = Encoder::new();
        inner
            .write_integer(&master.to_bytes())
            .write_bit_string(&other.public_key().to_bytes());
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        assert_eq!(
            SignMasterPrivateKey::from_der(&enc.finish()).unwrap_err(),
            CryptoError::InvalidKey
        );

        let enc_master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let enc_other = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        for (public, ok) in [(enc_master.public_key(), true), (enc_other.public_key(), false)] {
            let mut inner = Encoder::new();
            inner
                .write_integer(&enc_master.to_bytes())
                .write_bit_string(&public.to_bytes());
            let mut enc = Encoder::new();
            enc.write_sequence(&inner.finish());
            assert_eq!(EncryptMasterPrivateKey::from_der(&enc.finish()).is_ok(), ok);
        }

        let mut trailing = der.clone();
        trailing.push(0);
        assert_eq!(
            SignMasterPrivateKey::from_der(&trailing).unwrap_err(),
            CryptoError::DecodeTrailingData
        );
    }

    #[test]
    fn test_master_public_der_forms() {
        let master = EncryptMasterPrivateKey::from_bytes(&hex(ENC_MASTER)).unwrap();
        let public = master.public_key();
        assert_eq!(&EncryptMasterPublicKey::from_der(&public.to_der()).unwrap(), public);
        assert_eq!(
            &EncryptMasterPublicKey::from_der(&public.to_der_compressed()).unwrap(),
            public
        );
        let mut enc = Encoder::new();
        enc.write_sequence(&public.to_der());
        assert_eq!(&EncryptMasterPublicKey::from_der(&enc.finish()).unwrap(), public);

        let sign_master = SignMasterPrivateKey::from_bytes(&hex(SIGN_MASTER)).unwrap();
        let sign_pub = sign_master.public_key();
        assert_eq!(&SignMasterPublicKey::from_der(&sign_pub.to_der()).unwrap(), sign_pub);
        assert_eq!(
            &SignMasterPublicKey::from_bytes(&sign_pub.to_compressed()).unwrap(),
            sign_pub
        );
    }

    #[test]
    fn test_user_private_der_forms() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();

        let bare = EncryptPrivateKey::from_der(&user.to_der()).unwrap();
        assert_eq!(bare, user);
        assert!(bare.master_public_key().is_none());
        assert_eq!(bare.require_master().unwrap_err(), CryptoError::InvalidKey);

        let full = EncryptPrivateKey::from_der(&user.to_der_with_master().unwrap()).unwrap();
        assert_eq!(full, user);
        assert_eq!(full.master_public_key(), Some(master.public_key()));

        let sign_master = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let sign_user = sign_master.generate_user_key(b"Alice", sm9_hid::SIGN).unwrap();
        let mut decoded = SignPrivateKey::from_der(&sign_user.to_der()).unwrap();
        assert!(decoded.to_der_with_master().is_err());
        decoded.set_master_public_key(sign_master.public_key().clone());
        assert_eq!(
            decoded.to_der_with_master().unwrap(),
            sign_user.to_der_with_master().unwrap()
        );
    }

    #[test]
    fn test_user_key_rejects_bad_points() {
        assert_eq!(
            SignPrivateKey::from_bytes(&[0x04; 65]).unwrap_err(),
            CryptoError::Sm9InvalidPoint
        );
        let mut zero = [0u8; 65];
        zero[0] = 0x04;
        assert!(SignPrivateKey::from_bytes(&zero).is_err());
        assert!(EncryptPrivateKey::from_bytes(&[0x04; 64]).is_err());
        assert!(EncryptPrivateKey::from_der(&[0x03, 0x01]).is_err());
    }

    #[test]
    fn test_base_point_cache_is_stable() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let public = master.public_key().clone();
        let first = *public.base_point();
        assert_eq!(*public.base_point(), first);
        assert_eq!(
            first,
            pair(&G1Point::generator(), &G2Point::generator()).pow(&master.d)
        );
    }
}
