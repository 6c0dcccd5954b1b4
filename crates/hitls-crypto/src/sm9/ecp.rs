//! G1 point operations on E(Fp): y² = x³ + 5.
//!
//! Homogeneous projective coordinates (X, Y, Z) with affine
//! (x, y) = (X/Z, Y/Z), and the exception-free formulas of Renes,
//! Costello and Batina (Alg. 7 and 9) for a = 0. The identity is (0, 1, 0).

use hitls_types::CryptoError;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::curve;
use super::fp::Fp;
use super::scalar::Scalar;

/// Length of the raw `X || Y` encoding.
pub const G1_RAW_BYTES: usize = 64;
/// Length of the `0x04 || X || Y` encoding.
pub const G1_UNCOMPRESSED_BYTES: usize = 65;
/// Length of the `0x02/0x03 || X` encoding.
pub const G1_COMPRESSED_BYTES: usize = 33;

/// A point of G1.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct G1Point {
    x: Fp,
    y: Fp,
    z: Fp,
}

impl G1Point {
    pub fn identity() -> Self {
        Self {
            x: Fp::ZERO,
            y: Fp::ONE,
            z: Fp::ZERO,
        }
    }

    /// Generator P1.
    pub fn generator() -> Self {
        Self::from_affine(curve::G1_X, curve::G1_Y)
    }

    pub(crate) fn from_affine(x: Fp, y: Fp) -> Self {
        Self { x, y, z: Fp::ONE }
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero().into()
    }

    /// Y²Z = X³ + 5Z³; holds for the identity as well.
    pub fn is_on_curve(&self) -> bool {
        let lhs = self.y.square() * self.z;
        let rhs = self.x.square() * self.x + curve::B * self.z.square() * self.z;
        lhs == rhs
    }

    /// Affine coordinates; the identity maps to (0, 0).
    pub(crate) fn to_affine(&self) -> (Fp, Fp) {
        let z_inv = self.z.invert();
        (self.x * z_inv, self.y * z_inv)
    }

    /// Complete addition (RCB Alg. 7).
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
        t2 = curve::B3 * t2;
        let z3 = t1 + t2;
        t1 -= t2;
        y3 = curve::B3 * y3;

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
        let mut t2 = curve::B3 * z.square();
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
                acc = acc.add(&Self::select(&table, nibble));
            }
        }
        acc
    }

    /// [k]P1
    pub fn mul_base(k: &Scalar) -> Self {
        Self::generator().mul(k)
    }

    fn select(table: &[Self; 16], idx: u8) -> Self {
        let mut r = Self::identity();
        for (i, entry) in table.iter().enumerate() {
            r.conditional_assign(entry, (i as u8).ct_eq(&idx));
        }
        r
    }

    /// `X || Y`; the identity encodes as 64 zero bytes.
    pub fn to_bytes(&self) -> [u8; G1_RAW_BYTES] {
        let (x, y) = self.to_affine();
        let mut out = [0u8; G1_RAW_BYTES];
        out[..32].copy_from_slice(&x.to_bytes());
        out[32..].copy_from_slice(&y.to_bytes());
        out
    }

    /// `0x04 || X || Y`
    pub fn to_uncompressed(&self) -> [u8; G1_UNCOMPRESSED_BYTES] {
        let mut out = [0u8; G1_UNCOMPRESSED_BYTES];
        out[0] = 0x04;
        out[1..].copy_from_slice(&self.to_bytes());
        out
    }

    /// `(0x02 | y mod 2) || X`
    pub fn to_compressed(&self) -> [u8; G1_COMPRESSED_BYTES] {
        let (x, y) = self.to_affine();
        let mut out = [0u8; G1_COMPRESSED_BYTES];
        out[0] = 0x02 | y.is_odd().unwrap_u8();
        out[1..].copy_from_slice(&x.to_bytes());
        out
    }

    /// Decode the raw 64-byte `X || Y` form.
    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != G1_RAW_BYTES {
            return Err(CryptoError::Sm9InvalidPoint);
        }
        let x = Fp::from_slice(&data[..32]).ok_or(CryptoError::Sm9InvalidPoint)?;
        let y = Fp::from_slice(&data[32..]).ok_or(CryptoError::Sm9InvalidPoint)?;
        if bool::from(x.is_zero() & y.is_zero()) {
            return Ok(Self::identity());
        }
        let p = Self::from_affine(x, y);
        if !p.is_on_curve() {
            log::debug!("sm9: G1 encoding is not on the curve");
            return Err(CryptoError::Sm9InvalidPoint);
        }
        Ok(p)
    }

    /// Decode a 65-byte uncompressed or 33-byte compressed encoding.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        match (data.first(), data.len()) {
            (Some(0x04), G1_UNCOMPRESSED_BYTES) => Self::from_raw_bytes(&data[1..]),
            (Some(tag @ (0x02 | 0x03)), G1_COMPRESSED_BYTES) => {
                let x = Fp::from_slice(&data[1..]).ok_or(CryptoError::Sm9InvalidPoint)?;
                let y2 = x.square() * x + curve::B;
                let y = Option::<Fp>::from(y2.sqrt()).ok_or(CryptoError::Sm9InvalidPoint)?;
                let flip = y.is_odd() ^ Choice::from(tag & 1);
                Ok(Self::from_affine(x, Fp::conditional_select(&y, &-y, flip)))
            }
            _ => {
                log::debug!("sm9: bad G1 encoding length {}", data.len());
                Err(CryptoError::Sm9InvalidPoint)
            }
        }
    }
}

impl Default for G1Point {
    fn default() -> Self {
        Self::identity()
    }
}

impl ConditionallySelectable for G1Point {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp::conditional_select(&a.x, &b.x, choice),
            y: Fp::conditional_select(&a.y, &b.y, choice),
            z: Fp::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for G1Point {
    fn eq(&self, other: &Self) -> bool {
        let x = (self.x * other.z).ct_eq(&(other.x * self.z));
        let y = (self.y * other.z).ct_eq(&(other.y * self.z));
        (x & y).into()
    }
}

impl Eq for G1Point {}
