//! The target group GT, the order-N subgroup of Fp12*.

use hitls_types::CryptoError;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::curve;
use super::fp12::{Fp12, FP12_BYTES};
use super::scalar::Scalar;

/// Length of a serialized GT element.
pub const GT_BYTES: usize = FP12_BYTES;

/// An element of GT. The group is written multiplicatively.
#[derive(Clone, Copy, Debug, Default, Zeroize)]
pub struct Gt(Fp12);

impl Gt {
    pub fn identity() -> Self {
        Gt(Fp12::ONE)
    }

    /// e(P1, P2)
    pub fn generator() -> Self {
        Gt(Fp12::from_mont_limbs(&curve::GT_GEN))
    }

    pub(crate) fn from_fp12(f: Fp12) -> Self {
        Gt(f)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_one().into()
    }

    /// Group operation.
    pub fn mul(&self, rhs: &Gt) -> Gt {
        Gt(self.0 * rhs.0)
    }

    /// Group inverse; on the unit circle this is the p⁶ conjugation.
    pub fn invert(&self) -> Gt {
        Gt(self.0.frobenius_p6())
    }

    /// Constant-time exponentiation with a 4-bit fixed window and
    /// cyclotomic squarings.
    pub fn pow(&self, k: &Scalar) -> Gt {
        let mut table = [Fp12::ONE; 16];
        table[1] = self.0;
        for i in 2..16 {
            table[i] = table[i - 1] * self.0;
        }

        let mut acc = Fp12::ONE;
        for byte in k.to_bytes() {
            for nibble in [byte >> 4, byte & 0x0F] {
                acc = acc.cyclo6_square_n(4);
                let mut entry = Fp12::ONE;
                for (i, candidate) in table.iter().enumerate() {
                    entry.conditional_assign(candidate, (i as u8).ct_eq(&nibble));
                }
                acc = acc * entry;
            }
        }
        table.zeroize();
        Gt(acc)
    }

    /// generator^k
    pub fn pow_base(k: &Scalar) -> Gt {
        Gt::generator().pow(k)
    }

    pub fn to_bytes(&self) -> [u8; GT_BYTES] {
        self.0.to_bytes()
    }

    /// Decode twelve big-endian Fp values; every component must be below p.
    pub fn from_bytes(data: &[u8]) -> Result<Gt, CryptoError> {
        Fp12::from_slice(data)
            .map(Gt)
            .ok_or(CryptoError::Sm9InvalidGt)
    }
}

impl ConstantTimeEq for Gt {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Gt {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Gt {}
