//! Fp arithmetic for BN256 (256-bit prime field).
//!
//! Elements are kept in Montgomery form; every operation is constant time
//! with respect to the element values.

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use super::arith::{self, Limbs};
use super::curve;

/// Element of Fp (integers mod p), Montgomery form.
#[derive(Clone, Copy, Default, Zeroize)]
pub(crate) struct Fp(Limbs);

impl core::fmt::Debug for Fp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Fp(0x")?;
        for b in self.to_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl Fp {
    pub const ZERO: Fp = Fp([0; 4]);
    pub const ONE: Fp = Fp(curve::R_P);

    /// Wrap limbs that are already in Montgomery form.
    pub const fn from_mont(limbs: Limbs) -> Self {
        Fp(limbs)
    }

    pub fn from_u64(v: u64) -> Self {
        Fp::from_canonical(&[v, 0, 0, 0])
    }

    fn from_canonical(v: &Limbs) -> Self {
        Fp(arith::mont_mul(v, &curve::R2_P, &curve::P, curve::P_INV))
    }

    /// Decode a big-endian value, rejecting encodings that are not below p.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let v = arith::from_be_bytes(bytes);
        if arith::lt(&v, &curve::P) == 0 {
            return None;
        }
        Some(Fp::from_canonical(&v))
    }

    /// Decode from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: &[u8; 32] = bytes.try_into().ok()?;
        Fp::from_bytes(arr)
    }

    /// Reduce an arbitrary-length big-endian integer modulo p.
    pub fn from_bytes_wide(bytes: &[u8]) -> Self {
        Fp::from_canonical(&arith::reduce_be_bytes(bytes, &curve::P))
    }

    fn to_canonical(self) -> Limbs {
        arith::mont_mul(&self.0, &[1, 0, 0, 0], &curve::P, curve::P_INV)
    }

    pub fn to_bytes(self) -> [u8; 32] {
        arith::to_be_bytes(&self.to_canonical())
    }

    /// Low bit of the canonical value.
    pub fn is_odd(self) -> Choice {
        Choice::from((self.to_canonical()[0] & 1) as u8)
    }

    pub fn is_zero(self) -> Choice {
        self.ct_eq(&Fp::ZERO)
    }

    pub fn double(self) -> Self {
        self + self
    }

    pub fn triple(self) -> Self {
        self + self + self
    }

    pub fn square(self) -> Self {
        self * self
    }

    /// Square `n` times in place.
    pub fn sqr_n(&mut self, n: usize) {
        for _ in 0..n {
            *self = self.square();
        }
    }

    pub fn half(self) -> Self {
        self * curve::HALF
    }

    /// Raise to a public exponent. Timing depends on the exponent only.
    pub fn pow_vartime(self, exp: &Limbs) -> Self {
        let mut acc = Fp::ONE;
        let mut started = false;
        for bit in arith::bits_msb_first(exp) {
            if started {
                acc = acc.square();
            }
            if bit {
                acc *= self;
                started = true;
            }
        }
        acc
    }

    /// Fermat inversion; zero maps to zero.
    pub fn invert(self) -> Self {
        self.pow_vartime(&curve::P_MINUS_2)
    }

    /// Atkin square root for p ≡ 5 (mod 8).
    pub fn sqrt(self) -> CtOption<Self> {
        let a1 = self.pow_vartime(&curve::P_MINUS_5_OVER_8);
        let b = curve::TWO_EXP_P_MINUS_5_OVER_8 * a1;
        let i = (self * b.square()).double();
        let root = self * b * (i - Fp::ONE);
        CtOption::new(root, root.square().ct_eq(&self))
    }
}

impl ConstantTimeEq for Fp {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Fp {}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl Add for Fp {
    type Output = Fp;
    fn add(self, rhs: Fp) -> Fp {
        Fp(arith::add_mod(&self.0, &rhs.0, &curve::P))
    }
}

impl Sub for Fp {
    type Output = Fp;
    fn sub(self, rhs: Fp) -> Fp {
        Fp(arith::sub_mod(&self.0, &rhs.0, &curve::P))
    }
}

impl Mul for Fp {
    type Output = Fp;
    fn mul(self, rhs: Fp) -> Fp {
        Fp(arith::mont_mul(&self.0, &rhs.0, &curve::P, curve::P_INV))
    }
}

impl Neg for Fp {
    type Output = Fp;
    fn neg(self) -> Fp {
        Fp::ZERO - self
    }
}

impl AddAssign for Fp {
    fn add_assign(&mut self, rhs: Fp) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp {
    fn sub_assign(&mut self, rhs: Fp) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp {
    fn mul_assign(&mut self, rhs: Fp) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, b) in out.iter_mut().enumerate() {
            *b = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).unwrap();
        }
        out
    }

    #[test]
    fn test_montgomery_roundtrip() {
        let x = hex32("85aef3d078640c98597b6027b441a01ff1dd2c190f5e93c454806c11d8806141");
        let fx = Fp::from_bytes(&x).unwrap();
        assert_eq!(fx.to_bytes(), x);
        assert_eq!(Fp::ONE.to_bytes()[31], 1);
        assert_eq!(Fp::from_u64(5), curve::B);
        assert_eq!(Fp::from_u64(15), curve::B3);
    }

    #[test]
    fn test_reject_non_canonical() {
        let p = arith::to_be_bytes(&curve::P);
        assert!(Fp::from_bytes(&p).is_none());
        assert!(Fp::from_bytes(&[0xff; 32]).is_none());
        assert!(Fp::from_slice(&[0u8; 31]).is_none());
    }

    #[test]
    fn test_mul_known_value() {
        // x * y for the G1 generator coordinates
        let x = Fp::from_bytes(&hex32(
            "93de051d62bf718ff5ed0704487d01d6e1e4086909dc3280e8c4e4817c66dddd",
        ))
        .unwrap();
        let y = Fp::from_bytes(&hex32(
            "21fe8dda4f21e607631065125c395bbc1c1c00cbfa6024350c464cd70a3ea616",
        ))
        .unwrap();
        assert_eq!(x, curve::G1_X);
        assert_eq!(y, curve::G1_Y);
        // y² = x³ + 5
        assert_eq!(y.square(), x.square() * x + curve::B);
    }

    #[test]
    fn test_invert() {
        let a = Fp::from_u64(0x1234_5678);
        assert_eq!(a * a.invert(), Fp::ONE);
        assert_eq!(Fp::ZERO.invert(), Fp::ZERO);
        assert_eq!(Fp::from_u64(2).invert(), curve::HALF);
    }

    #[test]
    fn test_sqrt() {
        let a = Fp::from_u64(7) * curve::G1_X;
        let sq = a.square();
        let root = sq.sqrt().unwrap();
        assert!(root == a || root == -a);
        assert_eq!(Fp::ZERO.sqrt().unwrap(), Fp::ZERO);
        // -2 = u² has no root in Fp
        assert!(bool::from(Fp::from_u64(2).neg().sqrt().is_none()));
    }

    #[test]
    fn test_half_double_triple() {
        let a = curve::G1_Y;
        assert_eq!(a.half().double(), a);
        assert_eq!(a.triple(), a + a.double());
        let mut b = a;
        b.sqr_n(3);
        assert_eq!(b, a.square().square().square());
        assert_eq!(-a + a, Fp::ZERO);
    }

    #[test]
    fn test_conditional_select() {
        let a = Fp::from_u64(1);
        let b = Fp::from_u64(2);
        assert_eq!(Fp::conditional_select(&a, &b, Choice::from(0)), a);
        assert_eq!(Fp::conditional_select(&a, &b, Choice::from(1)), b);
        assert!(bool::from(Fp::from_u64(3).is_odd()));
    }
}
