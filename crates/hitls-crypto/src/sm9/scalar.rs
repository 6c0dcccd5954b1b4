//! Integers modulo the group order N.

use core::ops::{Add, Mul, Neg, Sub};

use hitls_types::CryptoError;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::arith::{self, Limbs};
use super::curve;

/// A scalar in [0, N), stored as canonical little-endian limbs.
#[derive(Clone, Copy, Default, Zeroize)]
pub struct Scalar(Limbs);

impl core::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Scalar(..)")
    }
}

impl Scalar {
    pub const ZERO: Scalar = Scalar([0; 4]);
    pub const ONE: Scalar = Scalar([1, 0, 0, 0]);

    pub fn from_u64(v: u64) -> Self {
        Scalar([v, 0, 0, 0])
    }

    /// Decode a 32-byte big-endian value, rejecting values not below N.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let v = arith::from_be_bytes(bytes);
        if arith::lt(&v, &curve::N) == 0 {
            return None;
        }
        Some(Scalar(v))
    }

    /// Decode a big-endian value of at most 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 32 {
            return None;
        }
        let mut buf = [0u8; 32];
        buf[32 - bytes.len()..].copy_from_slice(bytes);
        let s = Scalar::from_bytes(&buf);
        buf.zeroize();
        s
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        arith::to_be_bytes(&self.0)
    }

    /// Map a hash output to [1, N-1]: (v mod (N-1)) + 1.
    pub(crate) fn from_hash(bytes: &[u8]) -> Self {
        let r = arith::reduce_be_bytes(bytes, &curve::N_MINUS_1);
        Scalar(r) + Scalar::ONE
    }

    /// Uniform scalar in [1, N-1] by rejection sampling.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut buf = [0u8; 32];
        loop {
            rng.try_fill_bytes(&mut buf)
                .map_err(|_| CryptoError::EntropyFailure)?;
            if let Some(s) = Scalar::from_bytes(&buf) {
                if !bool::from(s.is_zero()) {
                    buf.zeroize();
                    return Ok(s);
                }
            }
        }
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Scalar::ZERO)
    }

    /// Multiplicative inverse by Fermat; zero maps to zero.
    pub fn invert(&self) -> Self {
        let m = |a: &Limbs, b: &Limbs| arith::mont_mul(a, b, &curve::N, curve::N_INV);
        let base = m(&self.0, &curve::R2_N);
        // Montgomery one
        let mut acc = m(&[1, 0, 0, 0], &curve::R2_N);
        for bit in arith::bits_msb_first(&curve::N_MINUS_2) {
            acc = m(&acc, &acc);
            if bit {
                acc = m(&acc, &base);
            }
        }
        Scalar(m(&acc, &[1, 0, 0, 0]))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Scalar(out)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(arith::add_mod(&self.0, &rhs.0, &curve::N))
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(arith::sub_mod(&self.0, &rhs.0, &curve::N))
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        let t = arith::mont_mul(&self.0, &rhs.0, &curve::N, curve::N_INV);
        Scalar(arith::mont_mul(&t, &curve::R2_N, &curve::N, curve::N_INV))
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar::ZERO - self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_reject_order() {
        let n = arith::to_be_bytes(&curve::N);
        assert!(Scalar::from_bytes(&n).is_none());
        let n_minus_1 = arith::to_be_bytes(&curve::N_MINUS_1);
        assert!(Scalar::from_bytes(&n_minus_1).is_some());
        assert!(Scalar::from_be_slice(&[0u8; 33]).is_none());
        assert_eq!(Scalar::from_be_slice(&[7]).unwrap(), Scalar::from_u64(7));
    }

    #[test]
    fn test_arithmetic() {
        let a = Scalar::from_u64(6);
        let b = Scalar::from_u64(7);
        assert_eq!(a * b, Scalar::from_u64(42));
        assert_eq!(a - b + b, a);
        assert_eq!(-a + a, Scalar::ZERO);
        let minus_one = Scalar(curve::N_MINUS_1);
        assert_eq!(minus_one * minus_one, Scalar::ONE);
    }

    #[test]
    fn test_invert() {
        let a = Scalar::from_u64(0xdead_beef);
        assert_eq!(a * a.invert(), Scalar::ONE);
        assert_eq!(Scalar::ZERO.invert(), Scalar::ZERO);
    }

    #[test]
    fn test_from_hash_range() {
        // N-1 itself reduces to 0, then maps to 1
        let v = arith::to_be_bytes(&curve::N_MINUS_1);
        assert_eq!(Scalar::from_hash(&v), Scalar::ONE);
        assert_eq!(Scalar::from_hash(&[0u8; 40]), Scalar::ONE);
    }

    #[test]
    fn test_random_nonzero() {
        let a = Scalar::random(&mut OsRng).unwrap();
        let b = Scalar::random(&mut OsRng).unwrap();
        assert!(!bool::from(a.is_zero()));
        assert_ne!(a, b);
    }
}
