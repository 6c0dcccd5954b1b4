//! SM9 identity-based cryptography.
//!
//! SM9 is a Chinese national standard (GB/T 38635) for identity-based
//! cryptographic algorithms over the BN256 pairing-friendly curve. A key
//! generation center holds a master key and issues user keys bound to an
//! identity string plus a one-byte `hid`; no certificates are involved.
//!
//! - Signatures: [`SignMasterPrivateKey`] issues [`SignPrivateKey`]s, which
//!   sign; [`SignMasterPublicKey::verify`] checks against an identity.
//! - Encryption: [`EncryptMasterPublicKey`] wraps keys and encrypts to an
//!   identity; [`EncryptPrivateKey`] unwraps and decrypts.
//! - Key exchange: [`KeyExchange`] drives one side of the three-pass protocol.
//!
//! ```ignore
//! use hitls_crypto::sm9::SignMasterPrivateKey;
//! use hitls_types::algorithm::sm9_hid;
//! use rand_core::OsRng;
//!
//! let master = SignMasterPrivateKey::generate(&mut OsRng)?;
//! let alice = master.generate_user_key(b"Alice", sm9_hid::SIGN)?;
//! let sig = alice.sign(&mut OsRng, b"digest")?;
//! assert!(master.public_key().verify(b"Alice", sm9_hid::SIGN, b"digest", &sig));
//! ```

mod arith;
mod curve;
mod ecp;
mod ecp2;
mod encrypt;
mod exchange;
mod fp;
mod fp12;
mod fp2;
mod fp4;
mod gt;
mod hash;
mod key;
mod pairing;
mod scalar;
mod sign;

pub use ecp::{G1Point, G1_COMPRESSED_BYTES, G1_RAW_BYTES, G1_UNCOMPRESSED_BYTES};
pub use ecp2::{G2Point, G2_COMPRESSED_BYTES, G2_RAW_BYTES, G2_UNCOMPRESSED_BYTES};
pub use encrypt::{EncrypterOpts, KeyPackage};
pub use exchange::{KeyExchange, KeyExchangeState};
pub use gt::{Gt, GT_BYTES};
pub use hash::{h1, h2, hash_to_base};
pub use key::{
    EncryptMasterPrivateKey, EncryptMasterPublicKey, EncryptPrivateKey, SignMasterPrivateKey,
    SignMasterPublicKey, SignPrivateKey,
};
pub use pairing::pair;
pub use scalar::Scalar;
pub use sign::{Sm9Signature, SM9_SIGNATURE_BYTES};
