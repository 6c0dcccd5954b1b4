//! 4x64-bit limb arithmetic shared by the base field and the scalar field.
//!
//! Limbs are little-endian. Every routine here runs in time independent of
//! the limb values.

pub(crate) type Limbs = [u64; 4];

#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 + b as u128 + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Returns the difference and a borrow of 0 or 1.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub(b as u128 + borrow as u128);
    (t as u64, (t >> 127) as u64)
}

/// `acc + b * c + carry`, split into (low, high).
#[inline(always)]
pub(crate) const fn mac(acc: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = acc as u128 + (b as u128) * (c as u128) + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Subtract `m` from the 257-bit value `(hi, t)` when the result stays
/// non-negative. Assumes `(hi, t) < 2m`.
#[inline(always)]
fn reduce_once(t: &Limbs, hi: u64, m: &Limbs) -> Limbs {
    let mut s = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        (s[i], borrow) = sbb(t[i], m[i], borrow);
    }
    let (_, borrow) = sbb(hi, 0, borrow);
    // borrow == 1 means t < m: keep t.
    let keep = borrow.wrapping_neg();
    let mut out = [0u64; 4];
    for i in 0..4 {
        out[i] = (t[i] & keep) | (s[i] & !keep);
    }
    out
}

pub(crate) fn add_mod(a: &Limbs, b: &Limbs, m: &Limbs) -> Limbs {
    let mut t = [0u64; 4];
    let mut carry = 0;
    for i in 0..4 {
        (t[i], carry) = adc(a[i], b[i], carry);
    }
    reduce_once(&t, carry, m)
}

pub(crate) fn sub_mod(a: &Limbs, b: &Limbs, m: &Limbs) -> Limbs {
    let mut t = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        (t[i], borrow) = sbb(a[i], b[i], borrow);
    }
    let mask = borrow.wrapping_neg();
    let mut carry = 0;
    for i in 0..4 {
        (t[i], carry) = adc(t[i], m[i] & mask, carry);
    }
    t
}

/// Montgomery product `a * b * 2^-256 mod m` (CIOS), with `m_inv = -m^-1 mod 2^64`.
pub(crate) fn mont_mul(a: &Limbs, b: &Limbs, m: &Limbs, m_inv: u64) -> Limbs {
    let mut t = [0u64; 6];
    for i in 0..4 {
        let mut carry = 0;
        for j in 0..4 {
            (t[j], carry) = mac(t[j], a[j], b[i], carry);
        }
        (t[4], carry) = adc(t[4], carry, 0);
        t[5] = carry;

        let k = t[0].wrapping_mul(m_inv);
        let (_, mut carry) = mac(t[0], k, m[0], 0);
        for j in 1..4 {
            (t[j - 1], carry) = mac(t[j], k, m[j], carry);
        }
        (t[3], carry) = adc(t[4], carry, 0);
        t[4] = t[5] + carry;
    }
    reduce_once(&[t[0], t[1], t[2], t[3]], t[4], m)
}

/// Returns 1 when `a < b`, otherwise 0.
pub(crate) fn lt(a: &Limbs, b: &Limbs) -> u64 {
    let mut borrow = 0;
    for i in 0..4 {
        (_, borrow) = sbb(a[i], b[i], borrow);
    }
    borrow
}

pub(crate) fn is_zero(a: &Limbs) -> bool {
    (a[0] | a[1] | a[2] | a[3]) == 0
}

pub(crate) fn from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut out = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut w = [0u8; 8];
        w.copy_from_slice(chunk);
        out[3 - i] = u64::from_be_bytes(w);
    }
    out
}

pub(crate) fn to_be_bytes(a: &Limbs) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..4 {
        out[i * 8..(i + 1) * 8].copy_from_slice(&a[3 - i].to_be_bytes());
    }
    out
}

/// Reduce a big-endian byte string of any length modulo `m` by shifting
/// one bit at a time. Only used on public hash outputs.
pub(crate) fn reduce_be_bytes(bytes: &[u8], m: &Limbs) -> Limbs {
    let mut r = [0u64; 4];
    for byte in bytes {
        for bit in (0..8).rev() {
            let top = r[3] >> 63;
            r = [
                (r[0] << 1) | ((byte >> bit) & 1) as u64,
                (r[1] << 1) | (r[0] >> 63),
                (r[2] << 1) | (r[1] >> 63),
                (r[3] << 1) | (r[2] >> 63),
            ];
            r = reduce_once(&r, top, m);
        }
    }
    r
}

/// Bits of a little-endian exponent, most significant first.
pub(crate) fn bits_msb_first(e: &Limbs) -> impl Iterator<Item = bool> + '_ {
    (0..256).rev().map(move |i| (e[i / 64] >> (i % 64)) & 1 == 1)
}
