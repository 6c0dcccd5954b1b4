//! SM9 three-pass key exchange (GB/T 38635.2 clause 7).
//!
//! The initiator calls [`KeyExchange::init`] then [`KeyExchange::confirm_responder`];
//! the responder calls [`KeyExchange::respond`] then [`KeyExchange::confirm_initiator`].
//! Both sides hold encryption-type user keys issued with hid `0x02`.

use hitls_types::CryptoError;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::ecp::{G1Point, G1_RAW_BYTES, G1_UNCOMPRESSED_BYTES};
use super::gt::Gt;
use super::hash;
use super::key::{EncryptMasterPublicKey, EncryptPrivateKey};
use super::pairing::pair;
use super::scalar::Scalar;
use crate::sm3::SM3_OUTPUT_SIZE;

const RESPONDER_TAG: u8 = 0x82;
const INITIATOR_TAG: u8 = 0x83;

/// Progress of a [`KeyExchange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExchangeState {
    Init,
    /// Initiator sent `R_A` and waits for `R_B`.
    AwaitingResponse,
    /// Responder sent `R_B` and waits for the initiator's confirmation.
    AwaitingConfirmation,
    Confirmed,
    Destroyed,
}

/// Values fixed once both ephemeral points are known.
#[derive(Zeroize)]
#[zeroize(drop)]
struct Agreement {
    secret: [u8; G1_RAW_BYTES],
    peer_secret: [u8; G1_RAW_BYTES],
    g1: Gt,
    g2: Gt,
    g3: Gt,
}

impl Agreement {
    fn empty() -> Self {
        Self {
            secret: [0u8; G1_RAW_BYTES],
            peer_secret: [0u8; G1_RAW_BYTES],
            g1: Gt::identity(),
            g2: Gt::identity(),
            g3: Gt::identity(),
        }
    }
}

/// One side of a single key exchange conversation.
pub struct KeyExchange<'a> {
    private_key: &'a EncryptPrivateKey,
    master: &'a EncryptMasterPublicKey,
    uid: Vec<u8>,
    peer_uid: Vec<u8>,
    key_len: usize,
    gen_signature: bool,
    state: KeyExchangeState,
    r: Scalar,
    secret: [u8; G1_RAW_BYTES],
    agreed: Agreement,
}

impl<'a> KeyExchange<'a> {
    /// Start a conversation between `uid` (this side) and `peer_uid`.
    ///
    /// `gen_signature` asks for the optional confirmation hashes `S_B`/`S_A`.
    /// The private key must carry its master public key.
    pub fn new(
        private_key: &'a EncryptPrivateKey,
        uid: &[u8],
        peer_uid: &[u8],
        key_len: usize,
        gen_signature: bool,
    ) -> Result<Self, CryptoError> {
        if key_len == 0 {
            return Err(CryptoError::InvalidArg);
        }
        let master = private_key.require_master()?;
        Ok(Self {
            private_key,
            master,
            uid: uid.to_vec(),
            peer_uid: peer_uid.to_vec(),
            key_len,
            gen_signature,
            state: KeyExchangeState::Init,
            r: Scalar::ZERO,
            secret: [0u8; G1_RAW_BYTES],
            agreed: Agreement::empty(),
        })
    }

    pub fn state(&self) -> KeyExchangeState {
        self.state
    }

    /// Initiator steps A1-A4: produce `R_A` for the responder.
    pub fn init<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        hid: u8,
    ) -> Result<[u8; G1_UNCOMPRESSED_BYTES], CryptoError> {
        self.expect_state(KeyExchangeState::Init)?;
        let r = Scalar::random(rng)?;
        self.init_with(hid, r)
    }

    pub(crate) fn init_with(
        &mut self,
        hid: u8,
        mut r: Scalar,
    ) -> Result<[u8; G1_UNCOMPRESSED_BYTES], CryptoError> {
        let step = self
            .expect_state(KeyExchangeState::Init)
            .and_then(|()| self.master.generate_user_public_key(&self.peer_uid, hid));
        let peer_pub = wipe_on_err(&mut r, step)?;
        let r_a = peer_pub.mul(&r);

        self.r = r;
        r.zeroize();
        self.secret = r_a.to_bytes();
        self.state = KeyExchangeState::AwaitingResponse;
        Ok(r_a.to_uncompressed())
    }

    /// Responder steps B1-B7: consume `R_A`, produce `R_B` and, when
    /// requested, the confirmation hash `S_B`.
    pub fn respond<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        hid: u8,
        r_a: &[u8],
    ) -> Result<([u8; G1_UNCOMPRESSED_BYTES], Option<[u8; SM3_OUTPUT_SIZE]>), CryptoError> {
        self.expect_state(KeyExchangeState::Init)?;
        let r = Scalar::random(rng)?;
        self.respond_with(hid, r_a, r)
    }

    pub(crate) fn respond_with(
        &mut self,
        hid: u8,
        r_a: &[u8],
        mut r: Scalar,
    ) -> Result<([u8; G1_UNCOMPRESSED_BYTES], Option<[u8; SM3_OUTPUT_SIZE]>), CryptoError> {
        let step = self.expect_state(KeyExchangeState::Init).and_then(|()| {
            let peer_point = decode_ephemeral(r_a)?;
            let peer_pub = self.master.generate_user_public_key(&self.peer_uid, hid)?;
            Ok((peer_point, peer_pub))
        });
        let (peer_point, peer_pub) = wipe_on_err(&mut r, step)?;
        let r_b = peer_pub.mul(&r);

        let g1 = pair(&peer_point, self.private_key.point());
        let agreed = Agreement {
            secret: r_b.to_bytes(),
            peer_secret: peer_point.to_bytes(),
            g1,
            g2: self.master.base_point().pow(&r),
            g3: g1.pow(&r),
        };
        let s_b = self
            .gen_signature
            .then(|| self.confirmation(&agreed, true, RESPONDER_TAG))
            .transpose();
        let s_b = wipe_on_err(&mut r, s_b)?;

        self.r = r;
        r.zeroize();
        self.secret = agreed.secret;
        self.agreed = agreed;
        self.state = KeyExchangeState::AwaitingConfirmation;
        Ok((r_b.to_uncompressed(), s_b))
    }

    /// Initiator steps A5-A8: consume `R_B` and the optional `S_B`, derive
    /// the shared key and, when requested, the confirmation hash `S_A`.
    ///
    /// Nothing is committed unless `S_B` checks out, so a failed call can
    /// be retried with the genuine response.
    pub fn confirm_responder(
        &mut self,
        r_b: &[u8],
        s_b: Option<&[u8]>,
    ) -> Result<(Vec<u8>, Option<[u8; SM3_OUTPUT_SIZE]>), CryptoError> {
        self.expect_state(KeyExchangeState::AwaitingResponse)?;
        let peer_point = decode_ephemeral(r_b)?;

        let g2 = pair(&peer_point, self.private_key.point());
        let agreed = Agreement {
            secret: self.secret,
            peer_secret: peer_point.to_bytes(),
            g1: self.master.base_point().pow(&self.r),
            g2,
            g3: g2.pow(&self.r),
        };
        if let Some(s_b) = s_b {
            let expected = self.confirmation(&agreed, false, RESPONDER_TAG)?;
            if !bool::from(expected[..].ct_eq(s_b)) {
                log::debug!("sm9: responder confirmation hash mismatch");
                return Err(CryptoError::Sm9VerifyFail);
            }
        }
        let key = self.shared_key(&agreed, false)?;
        let s_a = self
            .gen_signature
            .then(|| self.confirmation(&agreed, false, INITIATOR_TAG))
            .transpose()?;

        self.agreed = agreed;
        self.state = KeyExchangeState::Confirmed;
        Ok((key, s_a))
    }

    /// Responder step B8: check the optional `S_A` and derive the shared key.
    pub fn confirm_initiator(&mut self, s_a: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
        self.expect_state(KeyExchangeState::AwaitingConfirmation)?;
        if let Some(s_a) = s_a {
            let expected = self.confirmation(&self.agreed, true, INITIATOR_TAG)?;
            if !bool::from(expected[..].ct_eq(s_a)) {
                log::debug!("sm9: initiator confirmation hash mismatch");
                return Err(CryptoError::Sm9VerifyFail);
            }
        }
        let key = self.shared_key(&self.agreed, true)?;
        self.state = KeyExchangeState::Confirmed;
        Ok(key)
    }

    /// Wipe the ephemeral scalar, the exchanged points and the pairing values.
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        self.r.zeroize();
        self.secret.zeroize();
        self.agreed.zeroize();
        self.state = KeyExchangeState::Destroyed;
    }

    fn expect_state(&self, want: KeyExchangeState) -> Result<(), CryptoError> {
        if self.state != want {
            log::debug!("sm9: key exchange in state {:?}, expected {:?}", self.state, want);
            return Err(CryptoError::Sm9StateError);
        }
        Ok(())
    }

    /// Transcript `(uid_A, uid_B, R_A, R_B)` in initiator order.
    fn transcript<'s>(&'s self, agreed: &'s Agreement, is_responder: bool) -> [&'s [u8]; 4] {
        let (uid, peer_uid) = (self.uid.as_slice(), self.peer_uid.as_slice());
        let (secret, peer_secret) = (&agreed.secret[..], &agreed.peer_secret[..]);
        if is_responder {
            [peer_uid, uid, peer_secret, secret]
        } else {
            [uid, peer_uid, secret, peer_secret]
        }
    }

    fn confirmation(
        &self,
        agreed: &Agreement,
        is_responder: bool,
        tag: u8,
    ) -> Result<[u8; SM3_OUTPUT_SIZE], CryptoError> {
        let [a, b, ra, rb] = self.transcript(agreed, is_responder);
        let inner = hash::sm3(&[&agreed.g2.to_bytes()[..], &agreed.g3.to_bytes(), a, b, ra, rb])?;
        hash::sm3(&[&[tag][..], &agreed.g1.to_bytes(), &inner])
    }

    fn shared_key(&self, agreed: &Agreement, is_responder: bool) -> Result<Vec<u8>, CryptoError> {
        let [a, b, ra, rb] = self.transcript(agreed, is_responder);
        let mut g1 = agreed.g1.to_bytes();
        let mut g2 = agreed.g2.to_bytes();
        let mut g3 = agreed.g3.to_bytes();
        let key = hash::kdf(&[a, b, ra, rb, &g1, &g2, &g3], self.key_len);
        g1.zeroize();
        g2.zeroize();
        g3.zeroize();
        key
    }
}

impl Drop for KeyExchange<'_> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn wipe_on_err<T>(r: &mut Scalar, result: Result<T, CryptoError>) -> Result<T, CryptoError> {
    if result.is_err() {
        r.zeroize();
    }
    result
}

fn decode_ephemeral(bytes: &[u8]) -> Result<G1Point, CryptoError> {
    let point = if bytes.len() == G1_RAW_BYTES {
        G1Point::from_raw_bytes(bytes)?
    } else {
        G1Point::from_bytes(bytes)?
    };
    if point.is_identity() {
        log::debug!("sm9: ephemeral point is the identity");
        return Err(CryptoError::Sm9InvalidPoint);
    }
    Ok(point)
}
