//! SM9 key encapsulation and public-key encryption (GB/T 38635.2 clauses 8 and 9).
//!
//! Encryption derives `K1 || K2` from a wrapped key: `K1` keys the selected
//! symmetric mode and `K2` keys the SM3 tag `C3 = SM3(C2 || K2)`.

use hitls_types::algorithm::{Sm9EncType, SymCipherId};
use hitls_types::CryptoError;
use hitls_utils::asn1::{Decoder, Encoder};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::ecp::{G1Point, G1_COMPRESSED_BYTES, G1_RAW_BYTES, G1_UNCOMPRESSED_BYTES};
use super::hash;
use super::key::{EncryptMasterPublicKey, EncryptPrivateKey};
use super::pairing::pair;
use super::scalar::Scalar;
use crate::aes::AesKey;
use crate::modes::{self, cbc, cfb, ecb, ofb};
use crate::provider::BlockCipher;
use crate::sm3::SM3_OUTPUT_SIZE;
use crate::sm4::Sm4Key;

const BLOCK_SIZE: usize = 16;

/// Symmetric layer used by SM9 encryption.
///
/// `Xor` is the stream construction from the standard; the block modes key
/// the chosen cipher with `K1`. ECB and CBC pad with PKCS#7; CBC, OFB and
/// CFB prepend a random IV to `C2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncrypterOpts {
    #[default]
    Xor,
    Ecb(SymCipherId),
    Cbc(SymCipherId),
    Ofb(SymCipherId),
    Cfb(SymCipherId),
}

impl EncrypterOpts {
    /// Wire value carried in `SM9Cipher.encType`.
    pub fn encrypt_type(&self) -> Sm9EncType {
        match self {
            Self::Xor => Sm9EncType::Xor,
            Self::Ecb(_) => Sm9EncType::Ecb,
            Self::Cbc(_) => Sm9EncType::Cbc,
            Self::Ofb(_) => Sm9EncType::Ofb,
            Self::Cfb(_) => Sm9EncType::Cfb,
        }
    }

    /// Length of `K1` for a message (or `C2`) of `len` bytes.
    pub fn key_size(&self, len: usize) -> usize {
        match self {
            Self::Xor => len,
            Self::Ecb(id) | Self::Cbc(id) | Self::Ofb(id) | Self::Cfb(id) => id.key_size(),
        }
    }

    /// Produce `C2` from `plaintext` under `key`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        key: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match *self {
            Self::Xor => xor_with_key(key, plaintext),
            Self::Ecb(id) => {
                let cipher = new_cipher(id, key)?;
                ecb::ecb_encrypt(cipher.as_ref(), &modes::pkcs7_pad(plaintext, BLOCK_SIZE))
            }
            Self::Cbc(id) => {
                let cipher = new_cipher(id, key)?;
                let iv = random_iv(rng)?;
                let body =
                    cbc::cbc_encrypt(cipher.as_ref(), &iv, &modes::pkcs7_pad(plaintext, BLOCK_SIZE))?;
                Ok(prepend_iv(&iv, body))
            }
            Self::Ofb(id) => {
                let cipher = new_cipher(id, key)?;
                let iv = random_iv(rng)?;
                let mut body = plaintext.to_vec();
                ofb::ofb_crypt(cipher.as_ref(), &iv, &mut body)?;
                Ok(prepend_iv(&iv, body))
            }
            Self::Cfb(id) => {
                let cipher = new_cipher(id, key)?;
                let iv = random_iv(rng)?;
                let body = cfb::cfb_encrypt(cipher.as_ref(), &iv, plaintext)?;
                Ok(prepend_iv(&iv, body))
            }
        }
    }

    /// Recover the plaintext from `C2`.
    pub fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check_ciphertext_len(ciphertext.len())?;
        match *self {
            Self::Xor => xor_with_key(key, ciphertext),
            Self::Ecb(id) => {
                let cipher = new_cipher(id, key)?;
                let mut out = ecb::ecb_decrypt(cipher.as_ref(), ciphertext)?;
                modes::pkcs7_unpad(&mut out, BLOCK_SIZE)?;
                Ok(out)
            }
            Self::Cbc(id) => {
                let cipher = new_cipher(id, key)?;
                let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
                let mut out = cbc::cbc_decrypt(cipher.as_ref(), iv, body)?;
                modes::pkcs7_unpad(&mut out, BLOCK_SIZE)?;
                Ok(out)
            }
            Self::Ofb(id) => {
                let cipher = new_cipher(id, key)?;
                let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
                let mut out = body.to_vec();
                ofb::ofb_crypt(cipher.as_ref(), iv, &mut out)?;
                Ok(out)
            }
            Self::Cfb(id) => {
                let cipher = new_cipher(id, key)?;
                let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
                cfb::cfb_decrypt(cipher.as_ref(), iv, body)
            }
        }
    }

    fn check_ciphertext_len(&self, len: usize) -> Result<(), CryptoError> {
        let min = match self {
            Self::Xor | Self::Ecb(_) => 1,
            Self::Cbc(_) | Self::Ofb(_) | Self::Cfb(_) => BLOCK_SIZE + 1,
        };
        if len < min {
            return Err(CryptoError::Sm9Decryption);
        }
        Ok(())
    }
}

fn new_cipher(id: SymCipherId, key: &[u8]) -> Result<Box<dyn BlockCipher>, CryptoError> {
    if key.len() != id.key_size() {
        return Err(CryptoError::InvalidKeyLength {
            expected: id.key_size(),
            got: key.len(),
        });
    }
    Ok(match id {
        SymCipherId::Sm4 => Box::new(Sm4Key::new(key)?),
        SymCipherId::Aes128 | SymCipherId::Aes192 | SymCipherId::Aes256 => {
            Box::new(AesKey::new(key)?)
        }
    })
}

fn xor_with_key(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if key.len() != data.len() {
        return Err(CryptoError::InvalidKeyLength {
            expected: data.len(),
            got: key.len(),
        });
    }
    Ok(data.iter().zip(key).map(|(d, k)| d ^ k).collect())
}

fn random_iv<R: RngCore + CryptoRng>(rng: &mut R) -> Result<[u8; BLOCK_SIZE], CryptoError> {
    let mut iv = [0u8; BLOCK_SIZE];
    rng.try_fill_bytes(&mut iv)
        .map_err(|_| CryptoError::EntropyFailure)?;
    Ok(iv)
}

fn prepend_iv(iv: &[u8], body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(iv.len() + body.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&body);
    out
}

fn is_all_zero(bytes: &[u8]) -> bool {
    bytes.iter().fold(0u8, |acc, b| acc | b) == 0
}

/// `SM9KeyPackage ::= SEQUENCE { key OCTET STRING, cipher BIT STRING }`
#[derive(Clone)]
pub struct KeyPackage {
    key: Vec<u8>,
    cipher: G1Point,
}

impl KeyPackage {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Uncompressed encoding of the encapsulation point `C`.
    pub fn cipher(&self) -> [u8; G1_UNCOMPRESSED_BYTES] {
        self.cipher.to_uncompressed()
    }

    pub fn to_der(&self) -> Vec<u8> {
        let mut inner = Encoder::new();
        inner
            .write_octet_string(&self.key)
            .write_bit_string(&self.cipher.to_uncompressed());
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        enc.finish()
    }

    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let mut outer = Decoder::new(der);
        let mut seq = outer.read_sequence()?;
        outer.finish()?;
        let key = seq.read_octet_string()?.to_vec();
        let cipher = G1Point::from_bytes(seq.read_bit_string()?)?;
        seq.finish()?;
        Ok(Self { key, cipher })
    }
}

impl Drop for KeyPackage {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// `SM9Cipher ::= SEQUENCE { encType INTEGER, C1 BIT STRING, C3 OCTET STRING, C2 OCTET STRING }`
struct CipherParts<'a> {
    enc_type: Option<Sm9EncType>,
    c1: G1Point,
    c3: &'a [u8],
    c2: &'a [u8],
}

impl<'a> CipherParts<'a> {
    fn from_der(der: &'a [u8]) -> Result<Self, CryptoError> {
        let mut outer = Decoder::new(der);
        let mut seq = outer.read_sequence()?;
        outer.finish()?;
        let enc_type = u8::try_from(seq.read_u64()?)
            .ok()
            .and_then(Sm9EncType::from_u8);
        let c1 = seq.read_bit_string()?;
        let c3 = seq.read_octet_string()?;
        let c2 = seq.read_octet_string()?;
        seq.finish()?;
        Ok(Self {
            enc_type,
            c1: G1Point::from_bytes(c1)?,
            c3,
            c2,
        })
    }

    fn from_raw(data: &'a [u8]) -> Result<Self, CryptoError> {
        if data.len() <= G1_RAW_BYTES + SM3_OUTPUT_SIZE {
            log::debug!("sm9: raw ciphertext too short ({} bytes)", data.len());
            return Err(CryptoError::Sm9Decryption);
        }
        let (c1, rest) = data.split_at(G1_RAW_BYTES);
        let (c3, c2) = rest.split_at(SM3_OUTPUT_SIZE);
        Ok(Self {
            enc_type: None,
            c1: G1Point::from_raw_bytes(c1)?,
            c3,
            c2,
        })
    }
}

impl EncryptMasterPublicKey {
    /// Encapsulate a fresh `key_len`-byte key for `uid || hid`.
    ///
    /// Returns the key and the uncompressed encapsulation point `C`.
    pub fn wrap_key<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        key_len: usize,
    ) -> Result<(Vec<u8>, [u8; G1_UNCOMPRESSED_BYTES]), CryptoError> {
        let (key, c) = self.wrap_key_with(rng, uid, hid, key_len, |rng| Scalar::random(rng))?;
        Ok((key, c.to_uncompressed()))
    }

    /// Encapsulate and return the DER `SM9KeyPackage`.
    pub fn wrap_key_der<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        key_len: usize,
    ) -> Result<Vec<u8>, CryptoError> {
        let (key, cipher) = self.wrap_key_with(rng, uid, hid, key_len, |rng| Scalar::random(rng))?;
        Ok(KeyPackage { key, cipher }.to_der())
    }

    pub(crate) fn wrap_key_with<R, F>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        key_len: usize,
        next_r: F,
    ) -> Result<(Vec<u8>, G1Point), CryptoError>
    where
        F: FnMut(&mut R) -> Result<Scalar, CryptoError>,
    {
        self.wrap_rounds(rng, uid, hid, key_len, next_r, hash::kdf)
    }

    /// Key-wrap loop with the KDF supplied by `derive`.
    fn wrap_rounds<R, F, D>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        key_len: usize,
        mut next_r: F,
        mut derive: D,
    ) -> Result<(Vec<u8>, G1Point), CryptoError>
    where
        F: FnMut(&mut R) -> Result<Scalar, CryptoError>,
        D: FnMut(&[&[u8]], usize) -> Result<Vec<u8>, CryptoError>,
    {
        if key_len == 0 {
            return Err(CryptoError::InvalidArg);
        }
        let q = self.generate_user_public_key(uid, hid)?;
        let g = self.base_point();
        loop {
            let mut r = next_r(rng)?;
            let c = q.mul(&r);
            let mut w = g.pow(&r);
            r.zeroize();
            let mut w_bytes = w.to_bytes();
            let key = derive(&[&c.to_bytes()[..], &w_bytes, uid], key_len)?;
            w.zeroize();
            w_bytes.zeroize();
            if is_all_zero(&key) {
                log::debug!("sm9: wrapped key is all zero, retrying");
                continue;
            }
            return Ok((key, c));
        }
    }

    /// Encrypt to `uid || hid`, returning the raw `C1 || C3 || C2` form with
    /// `C1` as the 64-byte `X || Y` encoding.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        plaintext: &[u8],
        opts: &EncrypterOpts,
    ) -> Result<Vec<u8>, CryptoError> {
        let (c1, c3, c2) =
            self.encrypt_with(rng, uid, hid, plaintext, opts, |rng| Scalar::random(rng))?;
        let mut out = Vec::with_capacity(G1_RAW_BYTES + SM3_OUTPUT_SIZE + c2.len());
        out.extend_from_slice(&c1.to_bytes());
        out.extend_from_slice(&c3);
        out.extend_from_slice(&c2);
        Ok(out)
    }

    /// Encrypt to `uid || hid`, returning the DER `SM9Cipher`.
    pub fn encrypt_der<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        plaintext: &[u8],
        opts: &EncrypterOpts,
    ) -> Result<Vec<u8>, CryptoError> {
        let (c1, c3, c2) =
            self.encrypt_with(rng, uid, hid, plaintext, opts, |rng| Scalar::random(rng))?;
        let mut inner = Encoder::new();
        inner
            .write_u64(u64::from(opts.encrypt_type().as_u8()))
            .write_bit_string(&c1.to_uncompressed())
            .write_octet_string(&c3)
            .write_octet_string(&c2);
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        Ok(enc.finish())
    }

    pub(crate) fn encrypt_with<R, F>(
        &self,
        rng: &mut R,
        uid: &[u8],
        hid: u8,
        plaintext: &[u8],
        opts: &EncrypterOpts,
        next_r: F,
    ) -> Result<(G1Point, [u8; SM3_OUTPUT_SIZE], Vec<u8>), CryptoError>
    where
        R: RngCore + CryptoRng,
        F: FnMut(&mut R) -> Result<Scalar, CryptoError>,
    {
        if plaintext.is_empty() {
            return Err(CryptoError::Sm9EmptyPlaintext);
        }
        let k1_len = opts.key_size(plaintext.len());
        let (mut key, c1) = self.wrap_key_with(rng, uid, hid, k1_len + SM3_OUTPUT_SIZE, next_r)?;
        let (k1, k2) = key.split_at(k1_len);
        let sealed = opts
            .encrypt(rng, k1, plaintext)
            .and_then(|c2| Ok((hash::sm3(&[c2.as_slice(), k2])?, c2)));
        key.zeroize();
        let (c3, c2) = sealed?;
        Ok((c1, c3, c2))
    }
}

impl EncryptPrivateKey {
    /// Recover a wrapped key from its encapsulation point.
    ///
    /// `cipher` may be the 65-byte uncompressed or 33-byte compressed point,
    /// the 64-byte raw form, or a DER BIT STRING around the point.
    pub fn unwrap_key(&self, uid: &[u8], cipher: &[u8], key_len: usize) -> Result<Vec<u8>, CryptoError> {
        let c = match cipher.len() {
            G1_RAW_BYTES => G1Point::from_raw_bytes(cipher)?,
            G1_UNCOMPRESSED_BYTES | G1_COMPRESSED_BYTES => G1Point::from_bytes(cipher)?,
            _ => {
                let mut dec = Decoder::new(cipher);
                let bits = dec
                    .read_bit_string()
                    .and_then(|bits| dec.finish().map(|_| bits))
                    .map_err(|_| CryptoError::Sm9InvalidPoint)?;
                G1Point::from_bytes(bits)?
            }
        };
        self.unwrap_point(uid, &c, key_len)
    }

    fn unwrap_point(&self, uid: &[u8], c: &G1Point, key_len: usize) -> Result<Vec<u8>, CryptoError> {
        self.unwrap_point_with(uid, c, key_len, hash::kdf)
    }

    fn unwrap_point_with<D>(
        &self,
        uid: &[u8],
        c: &G1Point,
        key_len: usize,
        derive: D,
    ) -> Result<Vec<u8>, CryptoError>
    where
        D: FnOnce(&[&[u8]], usize) -> Result<Vec<u8>, CryptoError>,
    {
        if key_len == 0 {
            return Err(CryptoError::InvalidArg);
        }
        if c.is_identity() {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        let mut w = pair(c, self.point());
        let mut w_bytes = w.to_bytes();
        let key = derive(&[&c.to_bytes()[..], &w_bytes, uid], key_len);
        w.zeroize();
        w_bytes.zeroize();
        let key = key?;
        if is_all_zero(&key) {
            log::debug!("sm9: unwrapped key is all zero");
            return Err(CryptoError::Sm9Decryption);
        }
        Ok(key)
    }

    /// Decrypt a ciphertext addressed to `uid`.
    ///
    /// DER input (leading `0x30` that parses as `SM9Cipher`) is routed to
    /// [`decrypt_der`](Self::decrypt_der); anything else is read as the raw
    /// `C1 || C3 || C2` form.
    pub fn decrypt(&self, uid: &[u8], ciphertext: &[u8], opts: &EncrypterOpts) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.first() == Some(&0x30) {
            if let Ok(parts) = CipherParts::from_der(ciphertext) {
                return self.open(uid, &parts, opts, true);
            }
        }
        let parts = CipherParts::from_raw(ciphertext)?;
        self.open(uid, &parts, opts, false)
    }

    /// Decrypt a DER `SM9Cipher`; its `encType` must match `opts`.
    pub fn decrypt_der(&self, uid: &[u8], der: &[u8], opts: &EncrypterOpts) -> Result<Vec<u8>, CryptoError> {
        let parts = CipherParts::from_der(der)?;
        self.open(uid, &parts, opts, true)
    }

    fn open(
        &self,
        uid: &[u8],
        parts: &CipherParts<'_>,
        opts: &EncrypterOpts,
        check_type: bool,
    ) -> Result<Vec<u8>, CryptoError> {
        if check_type && parts.enc_type != Some(opts.encrypt_type()) {
            log::debug!(
                "sm9: ciphertext encType {:?} does not match {:?}",
                parts.enc_type,
                opts.encrypt_type()
            );
            return Err(CryptoError::InvalidArg);
        }
        if parts.c3.len() != SM3_OUTPUT_SIZE {
            return Err(CryptoError::Sm9Decryption);
        }
        opts.check_ciphertext_len(parts.c2.len())?;

        let k1_len = opts.key_size(parts.c2.len());
        let mut key = self.unwrap_point(uid, &parts.c1, k1_len + SM3_OUTPUT_SIZE)?;
        let (k1, k2) = key.split_at(k1_len);
        let tag = hash::sm3(&[parts.c2, k2])?;
        let result = if bool::from(tag[..].ct_eq(parts.c3)) {
            opts.decrypt(k1, parts.c2)
                .map_err(|_| CryptoError::Sm9Decryption)
        } else {
            log::debug!("sm9: ciphertext tag mismatch");
            Err(CryptoError::Sm9Decryption)
        };
        key.zeroize();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm9::key::EncryptMasterPrivateKey;
    use hitls_types::algorithm::sm9_hid;
    use rand_core::OsRng;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn sample_master() -> EncryptMasterPrivateKey {
        EncryptMasterPrivateKey::from_bytes(&hex(
            "0001EDEE3778F441F8DEA3D9FA0ACC4E07EE36C93F9A08618AF4AD85CEDE1C22",
        ))
        .unwrap()
    }

    fn all_opts() -> Vec<EncrypterOpts> {
        let mut opts = vec![EncrypterOpts::Xor];
        for id in [
            SymCipherId::Sm4,
            SymCipherId::Aes128,
            SymCipherId::Aes192,
            SymCipherId::Aes256,
        ] {
            opts.extend([
                EncrypterOpts::Ecb(id),
                EncrypterOpts::Cbc(id),
                EncrypterOpts::Ofb(id),
                EncrypterOpts::Cfb(id),
            ]);
        }
        opts
    }

    #[test]
    fn test_wrap_key_standard_vector() {
        let master = sample_master();
        let public = master.public_key();
        let q = public.generate_user_public_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
        assert_eq!(
            q.to_bytes().to_vec(),
            hex(concat!(
                "709d165808b0a43e2574e203fa885abcbab16a240c4c1916552e7c43d09763b8",
                "693269a6be2456f43333758274786b6051ff87b7f198da4ba1a2c6e336f51fcc",
            ))
        );

        let r = Scalar::from_be_slice(&hex(
            "74015F8489C01EF4270456F9E6475BFB602BDE7F33FD482AB4E3684A6722",
        ))
        .unwrap();
        let (key, c) = public
            .wrap_key_with(&mut OsRng, b"Bob", sm9_hid::ENCRYPT, 32, |_| Ok(r))
            .unwrap();
        assert_eq!(
            c.to_bytes().to_vec(),
            hex(concat!(
                "1edee2c3f465914491de44cefb2cb434ab02c308d9dc5e2067b4fed5aaac8a0f",
                "1c9b4c435eca35ab83bb734174c0f78fde81a53374aff3b3602bbc5e37be9a4c",
            ))
        );
        assert_eq!(
            key,
            hex("4ff5cf86d2ad40c8f4bac98d76abdbde0c0e2f0a829d3f911ef5b2bce0695480")
        );

        let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
        assert_eq!(user.unwrap_key(b"Bob", &c.to_bytes(), 32).unwrap(), key);
        assert_eq!(user.unwrap_key(b"Bob", &c.to_uncompressed(), 32).unwrap(), key);
    }

    #[test]
    fn test_encrypt_standard_vector() {
        let master = sample_master();
        let r = Scalar::from_be_slice(&hex(
            "AAC0541779C8FC45E3E2CB25C12B5D2576B2129AE8BB5EE2CBE5EC9E785C",
        ))
        .unwrap();
        let (c1, c3, c2) = master
            .public_key()
            .encrypt_with(
                &mut OsRng,
                b"Bob",
                sm9_hid::ENCRYPT,
                b"Chinese IBE standard",
                &EncrypterOpts::Xor,
                |_| Ok(r),
            )
            .unwrap();
        let mut ciphertext = c1.to_bytes().to_vec();
        ciphertext.extend_from_slice(&c3);
        ciphertext.extend_from_slice(&c2);
        assert_eq!(
            ciphertext,
            hex(concat!(
                "2445471164490618e1ee20528ff1d545b0f14c8bcaa44544f03dab5dac07d8ff",
                "42ffca97d57cddc05ea405f2e586feb3a6930715532b8000759f13059ed59ac0",
                "ba672387bcd6de5016a158a52bb2e7fc429197bcab70b25afee37a2b9db9f367",
                "1b5f5b0e951489682f3e64e1378cdd5da9513b1c",
            ))
        );

        let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
        let plain = user.decrypt(b"Bob", &ciphertext, &EncrypterOpts::Xor).unwrap();
        assert_eq!(plain, b"Chinese IBE standard");
    }

    #[test]
    fn test_wrap_retries_on_all_zero_key() {
        let master = sample_master();
        let public = master.public_key();
        let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
        let first = Scalar::from_be_slice(&[3]).unwrap();
        let second = Scalar::from_be_slice(&[5]).unwrap();

        let mut draws = vec![second, first];
        let mut rounds = 0;
        let (key, c) = public
            .wrap_rounds(
                &mut OsRng,
                b"Bob",
                sm9_hid::ENCRYPT,
                16,
                |_| draws.pop().ok_or(CryptoError::InvalidArg),
                |z, len| {
                    rounds += 1;
                    if rounds == 1 {
                        Ok(vec![0u8; len])
                    } else {
                        hash::kdf(z, len)
                    }
                },
            )
            .unwrap();
        assert_eq!(rounds, 2);
        let (expected, expected_c) = public
            .wrap_key_with(&mut OsRng, b"Bob", sm9_hid::ENCRYPT, 16, |_| Ok(second))
            .unwrap();
        assert_eq!((&key, &c), (&expected, &expected_c));
        assert_eq!(user.unwrap_key(b"Bob", &c.to_bytes(), 16).unwrap(), key);
    }

    #[test]
    fn test_unwrap_rejects_all_zero_key() {
        let master = sample_master();
        let user = master.generate_user_key(b"Bob", sm9_hid::ENCRYPT).unwrap();
        let c = G1Point::generator();
        assert_eq!(
            user.unwrap_point_with(b"Bob", &c, 16, |_, len| Ok(vec![0u8; len]))
                .unwrap_err(),
            CryptoError::Sm9Decryption
        );
        assert_eq!(user.unwrap_point(b"Bob", &c, 16).unwrap().len(), 16);
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        for key_len in [1, 16, 32, 33, 100] {
            let (key, cipher) = master
                .public_key()
                .wrap_key(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, key_len)
                .unwrap();
            assert_eq!(key.len(), key_len);
            assert_eq!(user.unwrap_key(b"emmansun", &cipher, key_len).unwrap(), key);
            assert_ne!(user.unwrap_key(b"emmansum", &cipher, key_len).unwrap(), key);
        }
    }

    #[test]
    fn test_wrap_key_der_package() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        let der = master
            .public_key()
            .wrap_key_der(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, 16)
            .unwrap();
        let package = KeyPackage::from_der(&der).unwrap();
        assert_eq!(package.to_der(), der);
        assert_eq!(package.key().len(), 16);

        let key = user.unwrap_key(b"emmansun", &package.cipher(), 16).unwrap();
        assert_eq!(key, package.key());

        let mut bit_string = Encoder::new();
        bit_string.write_bit_string(&package.cipher());
        let key = user.unwrap_key(b"emmansun", &bit_string.finish(), 16).unwrap();
        assert_eq!(key, package.key());
    }

    #[test]
    fn test_unwrap_rejects_bad_cipher() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        assert_eq!(
            user.unwrap_key(b"emmansun", &[0x04; 40], 16).unwrap_err(),
            CryptoError::Sm9InvalidPoint
        );
        let mut off_curve = G1Point::generator().to_uncompressed();
        off_curve[64] ^= 1;
        assert_eq!(
            user.unwrap_key(b"emmansun", &off_curve, 16).unwrap_err(),
            CryptoError::Sm9InvalidPoint
        );
        assert_eq!(
            user.unwrap_key(b"emmansun", &[0u8; 64], 16).unwrap_err(),
            CryptoError::Sm9InvalidPoint
        );
    }

    #[test]
    fn test_encrypt_decrypt_all_modes() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        let public = master.public_key();
        for opts in all_opts() {
            for len in [1usize, 15, 16, 17, 64] {
                let plaintext = vec![0x5au8; len];
                let raw = public
                    .encrypt(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, &plaintext, &opts)
                    .unwrap();
                assert_eq!(user.decrypt(b"emmansun", &raw, &opts).unwrap(), plaintext, "{opts:?}");

                let der = public
                    .encrypt_der(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, &plaintext, &opts)
                    .unwrap();
                assert_eq!(user.decrypt_der(b"emmansun", &der, &opts).unwrap(), plaintext);
                assert_eq!(user.decrypt(b"emmansun", &der, &opts).unwrap(), plaintext);
            }
        }
    }

    #[test]
    fn test_encrypt_empty_plaintext() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        for opts in all_opts() {
            assert_eq!(
                master
                    .public_key()
                    .encrypt(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, b"", &opts)
                    .unwrap_err(),
                CryptoError::Sm9EmptyPlaintext
            );
        }
    }

    #[test]
    fn test_decrypt_tampered() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        let opts = EncrypterOpts::Cbc(SymCipherId::Sm4);
        let ct = master
            .public_key()
            .encrypt(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, b"Chinese IBE standard", &opts)
            .unwrap();

        let mut bad_tag = ct.clone();
        bad_tag[G1_RAW_BYTES] ^= 1;
        assert_eq!(
            user.decrypt(b"emmansun", &bad_tag, &opts).unwrap_err(),
            CryptoError::Sm9Decryption
        );
        let mut bad_body = ct.clone();
        let last = bad_body.len() - 1;
        bad_body[last] ^= 1;
        assert_eq!(
            user.decrypt(b"emmansun", &bad_body, &opts).unwrap_err(),
            CryptoError::Sm9Decryption
        );
        assert_eq!(
            user.decrypt(b"emmansum", &ct, &opts).unwrap_err(),
            CryptoError::Sm9Decryption
        );
        assert_eq!(
            user.decrypt(b"emmansun", &ct[..G1_RAW_BYTES + SM3_OUTPUT_SIZE], &opts)
                .unwrap_err(),
            CryptoError::Sm9Decryption
        );
    }

    #[test]
    fn test_decrypt_short_c2_for_iv_modes() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        let ct = master
            .public_key()
            .encrypt(&mut OsRng, b"emmansun", sm9_hid::ENCRYPT, &[1u8; 16], &EncrypterOpts::Xor)
            .unwrap();
        // 16-byte C2 is only an IV for the IV modes.
        for opts in [
            EncrypterOpts::Cbc(SymCipherId::Sm4),
            EncrypterOpts::Ofb(SymCipherId::Sm4),
            EncrypterOpts::Cfb(SymCipherId::Sm4),
        ] {
            assert_eq!(
                user.decrypt(b"emmansun", &ct, &opts).unwrap_err(),
                CryptoError::Sm9Decryption
            );
        }
    }

    #[test]
    fn test_decrypt_der_enc_type_mismatch() {
        let master = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let user = master.generate_user_key(b"emmansun", sm9_hid::ENCRYPT).unwrap();
        let der = master
            .public_key()
            .encrypt_der(
                &mut OsRng,
                b"emmansun",
                sm9_hid::ENCRYPT,
                b"hello",
                &EncrypterOpts::Ofb(SymCipherId::Sm4),
            )
            .unwrap();
        assert_eq!(
            user.decrypt_der(b"emmansun", &der, &EncrypterOpts::Cfb(SymCipherId::Sm4))
                .unwrap_err(),
            CryptoError::InvalidArg
        );
        let mut trailing = der.clone();
        trailing.push(0);
        assert!(user
            .decrypt_der(b"emmansun", &trailing, &EncrypterOpts::Ofb(SymCipherId::Sm4))
            .is_err());
    }

    #[test]
    fn test_opts_metadata() {
        assert_eq!(EncrypterOpts::default(), EncrypterOpts::Xor);
        assert_eq!(EncrypterOpts::Xor.key_size(20), 20);
        assert_eq!(EncrypterOpts::Ecb(SymCipherId::Sm4).key_size(20), 16);
        assert_eq!(EncrypterOpts::Cbc(SymCipherId::Aes256).key_size(20), 32);
        assert_eq!(
            EncrypterOpts::Cfb(SymCipherId::Aes192).encrypt_type(),
            Sm9EncType::Cfb
        );
        let c2 = EncrypterOpts::Cbc(SymCipherId::Sm4)
            .encrypt(&mut OsRng, &[7u8; 16], b"abc")
            .unwrap();
        assert_eq!(c2.len(), 32);
        let c2 = EncrypterOpts::Ofb(SymCipherId::Sm4)
            .encrypt(&mut OsRng, &[7u8; 16], b"abc")
            .unwrap();
        assert_eq!(c2.len(), 19);
        assert!(EncrypterOpts::Ecb(SymCipherId::Sm4)
            .encrypt(&mut OsRng, &[7u8; 15], b"abc")
            .is_err());
    }
}
