//! G2 point operations on the twist E'(Fp²): y² = x³ + 5u.
//!
//! The public [`G2Point`] uses the same complete projective formulas as G1.
//! [`TwistPoint`] is the Jacobian form (x/z², y/z³) with t = z² carried by
//! the Miller loop.

use hitls_types::CryptoError;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::arith::{self, Limbs};
use super::curve;
use super::fp2::Fp2;
use super::scalar::Scalar;

/// Length of the raw `X || Y` encoding.
pub const G2_RAW_BYTES: usize = 128;
/// Length of the `0x04 || X || Y` encoding.
pub const G2_UNCOMPRESSED_BYTES: usize = 129;
/// Length of the `0x02/0x03 || X` encoding.
pub const G2_COMPRESSED_BYTES: usize = 65;

/// A point of G2.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct G2Point {
    x: Fp2,
    y: Fp2,
    z: Fp2,
}

impl G2Point {
    pub fn identity() -> Self {
        Self {
            x: Fp2::ZERO,
            y: Fp2::ONE,
            z: Fp2::ZERO,
        }
    }

    /// Generator P2.
    pub fn generator() -> Self {
        Self::from_affine(curve::G2_X, curve::G2_Y)
    }

    pub(crate) fn from_affine(x: Fp2, y: Fp2) -> Self {
        Self { x, y, z: Fp2::ONE }
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero().into()
    }

    pub fn is_on_curve(&self) -> bool {
        let lhs = self.y.square() * self.z;
        let rhs = self.x.square() * self.x + curve::TWIST_B * self.z.square() * self.z;
        lhs == rhs
    }

    /// [N]Q = O. The twist has a large cofactor, so decoded points need
    /// this on top of the curve equation.
    fn is_torsion_free(&self) -> bool {
        self.mul_vartime(&curve::N).is_identity()
    }

    pub(crate) fn to_affine(&self) -> (Fp2, Fp2) {
        let z_inv = self.z.invert();
        (self.x * z_inv, self.y * z_inv)
    }

    /// Complete addition (RCB Alg. 7) with 3b' = 15u.
    pub fn add(&self, rhs: &Self) -> Self {
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (rhs.x, rhs.y, rhs.z);

        let mut t0 = x1 * x2;
        let mut t1 = y1 * y2;
        let mut t2 = z1 * z2;
        let t3 = (x1 + y1) * (x2 + y2) - t0 - t1;
        let t4 = (y1 + z1) * (y2 + z2) - t1 - t2;
        let mut y3 = (x1 + z1) * (x2 + z2) - t0 - t2;

        t0 = t0.triple();
        t2 = curve::TWIST_B3 * t2;
        let z3 = t1 + t2;
        t1 -= t2;
        y3 = curve::TWIST_B3 * y3;

        Self {
            x: t3 * t1 - t4 * y3,
            y: t1 * z3 + y3 * t0,
            z: z3 * t4 + t0 * t3,
        }
    }

    /// Complete doubling (RCB Alg. 9).
    pub fn double(&self) -> Self {
        let (x, y, z) = (self.x, self.y, self.z);

        let mut t0 = y.square();
        let mut z3 = t0.double().double().double();
        let t1 = y * z;
        let mut t2 = curve::TWIST_B3 * z.square();
        let x3 = t2 * z3;
        let mut y3 = t0 + t2;
        z3 = t1 * z3;
        t2 = t2.triple();
        t0 -= t2;
        y3 = t0 * y3 + x3;

        Self {
            x: (t0 * (x * y)).double(),
            y: y3,
            z: z3,
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Constant-time scalar multiplication with a 4-bit fixed window.
    pub fn mul(&self, k: &Scalar) -> Self {
        let mut table = [Self::identity(); 16];
        table[1] = *self;
        for i in 2..16 {
            table[i] = table[i - 1].add(self);
        }

        let mut acc = Self::identity();
        for byte in k.to_bytes() {
            for nibble in [byte >> 4, byte & 0x0F] {
                for _ in 0..4 {
                    acc = acc.double();
                }
                let mut entry = Self::identity();
                for (i, candidate) in table.iter().enumerate() {
                    entry.conditional_assign(candidate, (i as u8).ct_eq(&nibble));
                }
                acc = acc.add(&entry);
            }
        }
        acc
    }

    /// [k]P2
    pub fn mul_base(k: &Scalar) -> Self {
        Self::generator().mul(k)
    }

    /// Double-and-add on a public multiplier.
    fn mul_vartime(&self, k: &Limbs) -> Self {
        let mut acc = Self::identity();
        for bit in arith::bits_msb_first(k) {
            acc = acc.double();
            if bit {
                acc = acc.add(self);
            }
        }
        acc
    }

    /// `X.c1 || X.c0 || Y.c1 || Y.c0`; the identity encodes as zeros.
    pub fn to_bytes(&self) -> [u8; G2_RAW_BYTES] {
        let (x, y) = self.to_affine();
        let mut out = [0u8; G2_RAW_BYTES];
        out[..64].copy_from_slice(&x.to_bytes());
        out[64..].copy_from_slice(&y.to_bytes());
        out
    }

    pub fn to_uncompressed(&self) -> [u8; G2_UNCOMPRESSED_BYTES] {
        let mut out = [0u8; G2_UNCOMPRESSED_BYTES];
        out[0] = 0x04;
        out[1..].copy_from_slice(&self.to_bytes());
        out
    }

    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_BYTES] {
        let (x, y) = self.to_affine();
        let mut out = [0u8; G2_COMPRESSED_BYTES];
        out[0] = 0x02 | y.sign_bit().unwrap_u8();
        out[1..].copy_from_slice(&x.to_bytes());
        out
    }

    fn checked(p: Self) -> Result<Self, CryptoError> {
        if !p.is_on_curve() || !p.is_torsion_free() {
            log::debug!("sm9: G2 encoding is not in the subgroup");
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(p)
    }

    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != G2_RAW_BYTES {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        let x = Fp2::from_slice(&data[..64]).ok_or(CryptoError::Sm9InvalidPoint)?;
        let y = Fp2::from_slice(&data[64..]).ok_or(CryptoError::Sm9InvalidPoint)?;
        if bool::from(x.is_zero() & y.is_zero()) {
            return Ok(Self::identity());
        }
        Self::checked(Self::from_affine(x, y))
    }

    /// Decode a 129-byte uncompressed or 65-byte compressed encoding.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        match (data.first(), data.len()) {
            (Some(0x04), G2_UNCOMPRESSED_BYTES) => Self::from_raw_bytes(&data[1..]),
            (Some(tag @ (0x02 | 0x03)), G2_COMPRESSED_BYTES) => {
                let x = Fp2::from_slice(&data[1..]).ok_or(CryptoError::Sm9InvalidPoint)?;
                let y2 = x.square() * x + curve::TWIST_B;
                let y = y2.sqrt_vartime().ok_or(CryptoError::Sm9InvalidPoint)?;
                let flip = y.sign_bit() ^ Choice::from(tag & 1);
                Self::checked(Self::from_affine(x, Fp2::conditional_select(&y, &-y, flip)))
            }
            _ => {
                log::debug!("sm9: bad G2 encoding length {}", data.len());
                Err(CryptoError::Sm9InvalidPoint)
            }
        }
    }
}

impl Default for G2Point {
    fn default() -> Self {
        Self::identity()
    }
}

impl ConditionallySelectable for G2Point {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for G2Point {
    fn eq(&self, other: &Self) -> bool {
        let x = (self.x * other.z).ct_eq(&(other.x * self.z));
        let y = (self.y * other.z).ct_eq(&(other.y * self.z));
        (x & y).into()
    }
}

impl Eq for G2Point {}

/// Jacobian twist point (x/z², y/z³) with t = z².
#[derive(Clone, Copy, Debug)]
pub(crate) struct TwistPoint {
    pub x: Fp2,
    pub y: Fp2,
    pub z: Fp2,
    pub t: Fp2,
}

impl TwistPoint {
    pub fn from_affine(x: Fp2, y: Fp2) -> Self {
        Self {
            x,
            y,
            z: Fp2::ONE,
            t: Fp2::ONE,
        }
    }

    pub fn to_affine(&self) -> (Fp2, Fp2) {
        let z_inv = self.z.invert();
        let z_inv2 = z_inv.square();
        (self.x * z_inv2, self.y * z_inv2 * z_inv)
    }

    /// π(Q): conjugate every coordinate and scale z by `FROB_CONSTANT`.
    pub fn frobenius(&self) -> Self {
        let z = self.z.conjugate().mul_fp(&curve::FROB_CONSTANT);
        Self {
            x: self.x.conjugate(),
            y: self.y.conjugate(),
            z,
            t: z.square(),
        }
    }

    /// -π²(Q): scale z by w^(p²-1) and negate y.
    pub fn frobenius_p2(&self) -> Self {
        let z = self.z.mul_fp(&curve::W_TO_P2_MINUS_1);
        Self {
            x: self.x,
            y: -self.y,
            z,
            t: z.square(),
        }
    }

    pub fn is_on_curve(&self) -> bool {
        // y² = x³ + b'·z⁶
        let z6 = self.t.square() * self.t;
        self.y.square() == self.x.square() * self.x + curve::TWIST_B * z6
    }
}
