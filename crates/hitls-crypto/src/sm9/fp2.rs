//! Fp2 = Fp[u] / (u² + 2) arithmetic for SM9 BN256.

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::curve;
use super::fp::Fp;

/// Element of Fp2 = c0 + c1·u where u² = -2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Zeroize)]
pub(crate) struct Fp2 {
    pub c0: Fp,
    pub c1: Fp,
}

impl Fp2 {
    pub const ZERO: Fp2 = Fp2::new(Fp::ZERO, Fp::ZERO);
    pub const ONE: Fp2 = Fp2::new(Fp::ONE, Fp::ZERO);

    pub const fn new(c0: Fp, c1: Fp) -> Self {
        Self { c0, c1 }
    }

    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero()
    }

    pub fn double(&self) -> Self {
        Fp2::new(self.c0.double(), self.c1.double())
    }

    pub fn triple(&self) -> Self {
        Fp2::new(self.c0.triple(), self.c1.triple())
    }

    /// (c0 + c1·u)² = (c0² - 2c1²) + 2c0c1·u
    pub fn square(&self) -> Self {
        let t = self.c0 * self.c1;
        Fp2::new(self.c0.square() - self.c1.square().double(), t.double())
    }

    /// Multiply by u: (c0 + c1·u)·u = -2c1 + c0·u
    pub fn mul_u(&self) -> Self {
        Fp2::new(-self.c1.double(), self.c0)
    }

    /// Product followed by a multiplication by u.
    pub fn mul_u1(&self, rhs: &Fp2) -> Self {
        (*self * *rhs).mul_u()
    }

    pub fn mul_fp(&self, s: &Fp) -> Self {
        Fp2::new(self.c0 * *s, self.c1 * *s)
    }

    /// Complex conjugation, which is also the p-power Frobenius on Fp2.
    pub fn conjugate(&self) -> Self {
        Fp2::new(self.c0, -self.c1)
    }

    /// 1/(c0 + c1·u) = (c0 - c1·u) / (c0² + 2c1²); zero maps to zero.
    pub fn invert(&self) -> Self {
        let t = (self.c0.square() + self.c1.square().double()).invert();
        Fp2::new(self.c0 * t, -(self.c1 * t))
    }

    /// Square root through the norm map. Only used on public inputs, so the
    /// branches are not constant time.
    pub fn sqrt_vartime(&self) -> Option<Fp2> {
        if bool::from(self.c1.is_zero()) {
            // Either the root is in Fp, or it is t·u with -2t² = c0.
            if let Some(r) = Option::<Fp>::from(self.c0.sqrt()) {
                return Some(Fp2::new(r, Fp::ZERO));
            }
            let t = Option::<Fp>::from((self.c0 * -curve::HALF).sqrt())?;
            return Some(Fp2::new(Fp::ZERO, t));
        }

        let norm = self.c0.square() + self.c1.square().double();
        let n = Option::<Fp>::from(norm.sqrt())?;
        for d in [(self.c0 + n).half(), (self.c0 - n).half()] {
            if let Some(r0) = Option::<Fp>::from(d.sqrt()) {
                let r1 = self.c1 * r0.double().invert();
                let root = Fp2::new(r0, r1);
                if root.square() == *self {
                    return Some(root);
                }
            }
        }
        None
    }

    /// Parity used to pick between ±y in compressed encodings: the low bit
    /// of c0, or of c1 when c0 is zero.
    pub fn sign_bit(&self) -> Choice {
        let bit = u8::conditional_select(
            &self.c0.is_odd().unwrap_u8(),
            &self.c1.is_odd().unwrap_u8(),
            self.c0.is_zero(),
        );
        Choice::from(bit)
    }

    /// Big-endian c1 || c0.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.c1.to_bytes());
        out[32..].copy_from_slice(&self.c0.to_bytes());
        out
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 64 {
            return None;
        }
        let c1 = Fp::from_slice(&bytes[..32])?;
        let c0 = Fp::from_slice(&bytes[32..])?;
        Some(Fp2::new(c0, c1))
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1)
    }
}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp2::new(
            Fp::conditional_select(&a.c0, &b.c0, choice),
            Fp::conditional_select(&a.c1, &b.c1, choice),
        )
    }
}

impl Add for Fp2 {
    type Output = Fp2;
    fn add(self, rhs: Fp2) -> Fp2 {
        Fp2::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fp2 {
    type Output = Fp2;
    fn sub(self, rhs: Fp2) -> Fp2 {
        Fp2::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

/// Karatsuba: c0 = a0b0 - 2a1b1, c1 = (a0+a1)(b0+b1) - a0b0 - a1b1.
impl Mul for Fp2 {
    type Output = Fp2;
    fn mul(self, rhs: Fp2) -> Fp2 {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Fp2::new(v0 - v1.double(), c1)
    }
}

impl Neg for Fp2 {
    type Output = Fp2;
    fn neg(self) -> Fp2 {
        Fp2::new(-self.c0, -self.c1)
    }
}

impl AddAssign for Fp2 {
    fn add_assign(&mut self, rhs: Fp2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp2 {
    fn sub_assign(&mut self, rhs: Fp2) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp2 {
    fn mul_assign(&mut self, rhs: Fp2) {
        *self = *self * rhs;
    }
}
