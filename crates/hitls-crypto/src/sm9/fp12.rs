//! Fp12 = Fp4[w] / (w³ - v) arithmetic for SM9 BN256.
//!
//! This is the pairing codomain. Besides the field operations it carries the
//! Frobenius maps and the cyclotomic squaring used by the final
//! exponentiation and by GT exponentiation.

use core::ops::Mul;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::curve;
use super::fp2::Fp2;
use super::fp4::Fp4;

/// Element of Fp12 = c0 + c1·w + c2·w² where w³ = v.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Zeroize)]
pub(crate) struct Fp12 {
    pub c0: Fp4,
    pub c1: Fp4,
    pub c2: Fp4,
}

pub(crate) const FP12_BYTES: usize = 384;

impl Fp12 {
    pub const ONE: Fp12 = Fp12::new(Fp4::ONE, Fp4::ZERO, Fp4::ZERO);

    pub const fn new(c0: Fp4, c1: Fp4, c2: Fp4) -> Self {
        Self { c0, c1, c2 }
    }

    pub fn is_one(&self) -> Choice {
        self.ct_eq(&Fp12::ONE)
    }

    pub fn square(&self) -> Self {
        *self * *self
    }

    /// Inverse via the norm down to Fp4; zero maps to zero.
    pub fn invert(&self) -> Self {
        let (a0, a1, a2) = (self.c0, self.c1, self.c2);
        let t0 = a0.square() - (a2 * a1).mul_v();
        let t1 = a2.square().mul_v() - a1 * a0;
        let t2 = a1.square() - a2 * a0;
        let f = ((t2 * a1).mul_v() + t0 * a0 + (t1 * a2).mul_v()).invert();
        Fp12::new(t0 * f, t1 * f, t2 * f)
    }

    /// x^(p⁶): conjugation over Fp6 = Fp2[w]. For unitary elements this
    /// is also the inverse.
    pub fn frobenius_p6(&self) -> Self {
        Fp12::new(
            self.c0.conjugate(),
            -self.c1.conjugate(),
            self.c2.conjugate(),
        )
    }

    /// x^p
    pub fn frobenius(&self) -> Self {
        let c0 = Fp4::new(
            self.c0.c0.conjugate(),
            self.c0.c1.conjugate().mul_fp(&curve::V_TO_P_MINUS_1),
        );
        let c1 = Fp4::new(
            self.c1.c0.conjugate().mul_fp(&curve::W_TO_P_MINUS_1),
            self.c1.c1.conjugate().mul_fp(&curve::W2_TO_P2_MINUS_1),
        );
        let c2 = Fp4::new(
            self.c2.c0.conjugate().mul_fp(&curve::W2_TO_P_MINUS_1),
            self.c2
                .c1
                .conjugate()
                .mul_fp(&curve::V_TO_P_MINUS_1_MW2_TO_P_MINUS_1),
        );
        Fp12::new(c0, c1, c2)
    }

    /// x^(p²)
    pub fn frobenius_p2(&self) -> Self {
        Fp12::new(
            self.c0.conjugate(),
            self.c1.conjugate().mul_fp(&curve::W_TO_P2_MINUS_1),
            self.c2.conjugate().mul_fp(&curve::W2_TO_P2_MINUS_1),
        )
    }

    /// x^(p³)
    pub fn frobenius_p3(&self) -> Self {
        let v = &curve::V_TO_P_MINUS_1;
        let c0 = Fp4::new(
            self.c0.c0.conjugate(),
            -self.c0.c1.conjugate().mul_fp(v),
        );
        let c1 = Fp4::new(
            self.c1.c0.conjugate().mul_fp(v),
            self.c1.c1.conjugate(),
        );
        let c2 = Fp4::new(
            -self.c2.c0.conjugate(),
            self.c2.c1.conjugate().mul_fp(v),
        );
        Fp12::new(c0, c1, c2)
    }

    /// Granger–Scott squaring, valid for elements of the cyclotomic
    /// subgroup: only three Fp4 squarings.
    pub fn cyclo6_square(&self) -> Self {
        let t0 = self.c0.square().triple();
        let t1 = self.c1.square().triple();
        let t2 = self.c2.square_v().triple();
        Fp12::new(
            t0 - self.c0.conjugate().double(),
            t2 + self.c1.conjugate().double(),
            t1 - self.c2.conjugate().double(),
        )
    }

    /// `n` cyclotomic squarings.
    pub fn cyclo6_square_n(&self, n: usize) -> Self {
        let mut r = *self;
        for _ in 0..n {
            r = r.cyclo6_square();
        }
        r
    }

    /// x^u for the BN parameter u, by a fixed addition chain of 62
    /// cyclotomic squarings. Only valid in the cyclotomic subgroup.
    pub fn pow_u(&self) -> Self {
        let x = *self;
        let mut t2 = x.cyclo6_square();
        let mut t1 = t2.cyclo6_square();
        let mut z = x * t1;
        let mut t0 = t1 * z;
        t2 = t2 * t0;
        let mut t3 = x * t2;
        t3 = t3.cyclo6_square_n(40);
        t3 = t2 * t3;
        t3 = t3.cyclo6_square_n(7);
        t2 = t2 * t3;
        t1 = t1 * t2;
        t1 = t1.cyclo6_square_n(4);
        t0 = t0 * t1;
        t0 = t0.cyclo6_square();
        t0 = x * t0;
        t0 = t0.cyclo6_square_n(6);
        z = z * t0;
        z.cyclo6_square()
    }

    /// Plain square-and-multiply by a public exponent.
    pub fn pow_vartime(&self, exp: &[u64]) -> Self {
        let mut acc = Fp12::ONE;
        for limb in exp.iter().rev() {
            for i in (0..64).rev() {
                acc = acc.square();
                if (limb >> i) & 1 == 1 {
                    acc = acc * *self;
                }
            }
        }
        acc
    }

    /// Twelve big-endian Fp values, highest coefficient first:
    /// c2 || c1 || c0, each Fp4 as c1 || c0, each Fp2 as c1 || c0.
    pub fn to_bytes(&self) -> [u8; FP12_BYTES] {
        let mut out = [0u8; FP12_BYTES];
        self.c2.write_bytes(&mut out[..128]);
        self.c1.write_bytes(&mut out[128..256]);
        self.c0.write_bytes(&mut out[256..]);
        out
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != FP12_BYTES {
            return None;
        }
        let c2 = Fp4::from_slice(&bytes[..128])?;
        let c1 = Fp4::from_slice(&bytes[128..256])?;
        let c0 = Fp4::from_slice(&bytes[256..])?;
        Some(Fp12::new(c0, c1, c2))
    }

    /// Build from twelve Montgomery-form limb sets in serialization order.
    pub const fn from_mont_limbs(l: &[[u64; 4]; 12]) -> Self {
        use super::fp::Fp;
        const fn fp2(hi: [u64; 4], lo: [u64; 4]) -> Fp2 {
            Fp2::new(Fp::from_mont(lo), Fp::from_mont(hi))
        }
        Fp12::new(
            Fp4::new(fp2(l[10], l[11]), fp2(l[8], l[9])),
            Fp4::new(fp2(l[6], l[7]), fp2(l[4], l[5])),
            Fp4::new(fp2(l[2], l[3]), fp2(l[0], l[1])),
        )
    }
}

impl ConstantTimeEq for Fp12 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1) & self.c2.ct_eq(&other.c2)
    }
}

impl ConditionallySelectable for Fp12 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp12::new(
            Fp4::conditional_select(&a.c0, &b.c0, choice),
            Fp4::conditional_select(&a.c1, &b.c1, choice),
            Fp4::conditional_select(&a.c2, &b.c2, choice),
        )
    }
}

/// Three-way Karatsuba:
/// c0 = ((a1+a2)(b1+b2) - v1 - v2)·v + v0
/// c1 = (a0+a1)(b0+b1) - v0 - v1 + v2·v
/// c2 = (a0+a2)(b0+b2) - v0 + v1 - v2
impl Mul for Fp12 {
    type Output = Fp12;
    fn mul(self, rhs: Fp12) -> Fp12 {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let v2 = self.c2 * rhs.c2;
        let c0 = ((self.c1 + self.c2) * (rhs.c1 + rhs.c2) - v1 - v2).mul_v() + v0;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1 + v2.mul_v();
        let c2 = (self.c0 + self.c2) * (rhs.c0 + rhs.c2) - v0 + v1 - v2;
        Fp12::new(c0, c1, c2)
    }
}
