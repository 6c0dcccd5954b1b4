//! Fp4 = Fp2[v] / (v² - u) arithmetic for SM9 BN256.

use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::fp::Fp;
use super::fp2::Fp2;

/// Element of Fp4 = c0 + c1·v where v² = u.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Zeroize)]
pub(crate) struct Fp4 {
    pub c0: Fp2,
    pub c1: Fp2,
}

impl Fp4 {
    pub const ZERO: Fp4 = Fp4::new(Fp2::ZERO, Fp2::ZERO);
    pub const ONE: Fp4 = Fp4::new(Fp2::ONE, Fp2::ZERO);

    pub const fn new(c0: Fp2, c1: Fp2) -> Self {
        Self { c0, c1 }
    }

    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero()
    }

    pub fn double(&self) -> Self {
        Fp4::new(self.c0.double(), self.c1.double())
    }

    pub fn triple(&self) -> Self {
        Fp4::new(self.c0.triple(), self.c1.triple())
    }

    /// (c0 + c1·v)² = (c0² + u·c1²) + 2c0c1·v
    pub fn square(&self) -> Self {
        Fp4::new(
            self.c0.square() + self.c1.square().mul_u(),
            (self.c0 * self.c1).double(),
        )
    }

    /// (c0 + c1·v)²·v, the squaring fused with a multiplication by v.
    pub fn square_v(&self) -> Self {
        Fp4::new(
            (self.c0 * self.c1).mul_u().double(),
            self.c0.square() + self.c1.square().mul_u(),
        )
    }

    /// Multiply by v: (c0 + c1·v)·v = u·c1 + c0·v
    pub fn mul_v(&self) -> Self {
        Fp4::new(self.c1.mul_u(), self.c0)
    }

    pub fn mul_fp2(&self, s: &Fp2) -> Self {
        Fp4::new(self.c0 * *s, self.c1 * *s)
    }

    pub fn mul_fp(&self, s: &Fp) -> Self {
        Fp4::new(self.c0.mul_fp(s), self.c1.mul_fp(s))
    }

    /// c0 - c1·v
    pub fn conjugate(&self) -> Self {
        Fp4::new(self.c0, -self.c1)
    }

    /// Conjugate both Fp2 coefficients.
    pub fn conjugate_coeffs(&self) -> Self {
        Fp4::new(self.c0.conjugate(), self.c1.conjugate())
    }

    /// 1/(c0 + c1·v) = (c0 - c1·v) / (c0² - u·c1²); zero maps to zero.
    pub fn invert(&self) -> Self {
        let t = (self.c0.square() - self.c1.square().mul_u()).invert();
        Fp4::new(self.c0 * t, -(self.c1 * t))
    }

    /// Big-endian c1 || c0.
    pub fn write_bytes(&self, out: &mut [u8]) {
        out[..64].copy_from_slice(&self.c1.to_bytes());
        out[64..128].copy_from_slice(&self.c0.to_bytes());
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 128 {
            return None;
        }
        let c1 = Fp2::from_slice(&bytes[..64])?;
        let c0 = Fp2::from_slice(&bytes[64..])?;
        Some(Fp4::new(c0, c1))
    }
}

impl ConstantTimeEq for Fp4 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1)
    }
}

impl ConditionallySelectable for Fp4 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp4::new(
            Fp2::conditional_select(&a.c0, &b.c0, choice),
            Fp2::conditional_select(&a.c1, &b.c1, choice),
        )
    }
}

impl Add for Fp4 {
    type Output = Fp4;
    fn add(self, rhs: Fp4) -> Fp4 {
        Fp4::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fp4 {
    type Output = Fp4;
    fn sub(self, rhs: Fp4) -> Fp4 {
        Fp4::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Mul for Fp4 {
    type Output = Fp4;
    fn mul(self, rhs: Fp4) -> Fp4 {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Fp4::new(v0 + v1.mul_u(), c1)
    }
}

impl Neg for Fp4 {
    type Output = Fp4;
    fn neg(self) -> Fp4 {
        Fp4::new(-self.c0, -self.c1)
    }
}
