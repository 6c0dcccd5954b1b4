//! BN256 curve parameters for SM9.
//!
//! Curve E(Fp): y² = x³ + 5 (a=0, b=5)
//! Twist E'(Fp²): y² = x³ + 5u (sextic twist)
//! Tower: Fp2=Fp[u]/(u²+2), Fp4=Fp2[v]/(v²-u), Fp12=Fp4[w]/(w³-v)
//!
//! Field constants are stored in Montgomery form (value · 2²⁵⁶ mod p).

use super::arith::Limbs;
use super::fp::Fp;
use super::fp2::Fp2;

/// BN256 prime: p
pub(crate) const P: Limbs = [
    0xe56f9b27e351457d,
    0x21f2934b1a7aeedb,
    0xd603ab4ff58ec745,
    0xb640000002a3a6f1,
];

/// -p⁻¹ mod 2⁶⁴
pub(crate) const P_INV: u64 = 0x892bc42c2f2ee42b;

/// 2²⁵⁶ mod p, the Montgomery form of one.
pub(crate) const R_P: Limbs = [
    0x1a9064d81caeba83,
    0xde0d6cb4e5851124,
    0x29fc54b00a7138ba,
    0x49bffffffd5c590e,
];

/// 2⁵¹² mod p
pub(crate) const R2_P: Limbs = [
    0x27dea312b417e2d2,
    0x88f8105fae1a5d3f,
    0xe479b522d6706e7b,
    0x2ea795a656f62fbd,
];

pub(crate) const P_MINUS_2: Limbs = [
    0xe56f9b27e351457b,
    0x21f2934b1a7aeedb,
    0xd603ab4ff58ec745,
    0xb640000002a3a6f1,
];

pub(crate) const P_MINUS_5_OVER_8: Limbs = [
    0x7cadf364fc6a28af,
    0xa43e5269634f5ddb,
    0x3ac07569feb1d8e8,
    0x16c80000005474de,
];

/// Subgroup order: N
pub(crate) const N: Limbs = [
    0xe56ee19cd69ecf25,
    0x49f2934b18ea8bee,
    0xd603ab4ff58ec744,
    0xb640000002a3a6f1,
];

/// -N⁻¹ mod 2⁶⁴
pub(crate) const N_INV: u64 = 0x1d02662351974b53;

/// 2⁵¹² mod N
pub(crate) const R2_N: Limbs = [
    0x7598cd79cd750c35,
    0xe4a08110bb6daeab,
    0xbfee4bae7d78a1f9,
    0x8894f5d163695d0e,
];

pub(crate) const N_MINUS_1: Limbs = [
    0xe56ee19cd69ecf24,
    0x49f2934b18ea8bee,
    0xd603ab4ff58ec744,
    0xb640000002a3a6f1,
];

pub(crate) const N_MINUS_2: Limbs = [
    0xe56ee19cd69ecf23,
    0x49f2934b18ea8bee,
    0xd603ab4ff58ec744,
    0xb640000002a3a6f1,
];

/// BN parameter u = 0x600000000058f98a.
pub(crate) const BN_U: u64 = 0x600000000058f98a;

/// NAF of 6u+2, least significant digit first.
pub(crate) const SIX_U_PLUS_2_NAF: [i8; 66] = [
    0, -1, 0, 0, 0, 0, 1, 0, 1, 0, 0, -1, 0, -1, 0, 0, 0, -1, 0, -1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 0, 0, 1,
];

/// b = 5
pub(crate) const B: Fp = Fp::from_mont([
    0xb9f2c1e8c8c71995,
    0x125df8f246a377fc,
    0x25e650d049188d1c,
    0x043fffffed866f63,
]);

/// 3b = 15, the constant of the complete addition formulas on E.
pub(crate) const B3: Fp = Fp::from_mont([
    0x2dd845ba5a554cbf,
    0x3719ead6d3ea67f6,
    0x71b2f270db49a754,
    0x0cbfffffc8934e29,
]);

/// b' = 5u, the twist coefficient.
pub(crate) const TWIST_B: Fp2 = Fp2::new(Fp::ZERO, B);

/// 3b' = 15u
pub(crate) const TWIST_B3: Fp2 = Fp2::new(Fp::ZERO, B3);

/// 2^((p-5)/8), used by the Atkin square root.
pub(crate) const TWO_EXP_P_MINUS_5_OVER_8: Fp = Fp::from_mont([
    0xd5dd560c5235102a,
    0xa3772bab091163ac,
    0x0ed7304fd0711ab0,
    0x8efb889ed7056e1e,
]);

/// 2⁻¹ mod p
pub(crate) const HALF: Fp = Fp::from_mont([0, 0, 0, 0x8000000000000000]);

/// Generator P1 on E(Fp).
pub(crate) const G1_X: Fp = Fp::from_mont([
    0x22e935e29860501b,
    0xa946fd5e0073282c,
    0xefd0cec817a649be,
    0x5129787c869140b5,
]);
pub(crate) const G1_Y: Fp = Fp::from_mont([
    0xee779649eb87f7c7,
    0x15563cbdec30a576,
    0x326353912824efbf,
    0x7215717763c39828,
]);

/// Generator P2 on E'(Fp²).
pub(crate) const G2_X: Fp2 = Fp2::new(
    Fp::from_mont([
        0x260226a68ce2da8f,
        0x7ee5645edbf6c06b,
        0xf8f57c82b1495444,
        0x61fcf018bc47c4d1,
    ]),
    Fp::from_mont([
        0xdb6db4822750a8a6,
        0x84c6135a5121f134,
        0x1874032f88791d41,
        0x905112f2b85f3a37,
    ]),
);
pub(crate) const G2_Y: Fp2 = Fp2::new(
    Fp::from_mont([
        0xc03f138f9171c24a,
        0x92fbab45a15a3ca7,
        0x2445561e2ff77cdb,
        0x108495e0c0f62ece,
    ]),
    Fp::from_mont([
        0xf7b82dac4c89bfbb,
        0x3706f3f6a49dc12f,
        0x1e29de93d3eef769,
        0x81e448c3c76a5d53,
    ]),
);

// Frobenius constants, named after the tower element they come from,
// e.g. W_TO_P_MINUS_1 = w^(p-1).

pub(crate) const V_TO_P_MINUS_1: Fp = Fp::from_mont([
    0x39b4ef0f3ee72529,
    0xdb043bf508582782,
    0xb8554ab054ac91e3,
    0x9848eec25498cab5,
]);

pub(crate) const W_TO_P_MINUS_1: Fp = Fp::from_mont([
    0x1a98dfbd4575299f,
    0x9ec8547b245c54fd,
    0xf51f5eac13df846c,
    0x9ef74015d5a16393,
]);

/// Scales z in the twist Frobenius; equal to w^(p-1).
pub(crate) const FROB_CONSTANT: Fp = W_TO_P_MINUS_1;

pub(crate) const W2_TO_P_MINUS_1: Fp = Fp::from_mont([
    0xb626197dce4736ca,
    0x08296b3557ed0186,
    0x9c705db2fd91512a,
    0x1c753e748601c992,
]);

pub(crate) const W_TO_P2_MINUS_1: Fp = W2_TO_P_MINUS_1;

pub(crate) const W2_TO_P2_MINUS_1: Fp = Fp::from_mont([
    0x81054fcd94e9c1c4,
    0x4c0e91cb8ce2df3e,
    0x4877b452e8aedfb4,
    0x88f53e748b491776,
]);

pub(crate) const V_TO_P_MINUS_1_MW2_TO_P_MINUS_1: Fp = Fp::from_mont([
    0x048baa79dcc34107,
    0x5e2e7ac4fe76c161,
    0x99399754365bd4bc,
    0xaf91aeac819b0e13,
]);

/// e(P1, P2) in serialization order: the coefficient of w²v u first,
/// the constant term last.
pub(crate) const GT_GEN: [Limbs; 12] = [
    [0xeb2aeaa2823d010c, 0xe192c39d7c3e6440, 0x68411e843fea2a9b, 0x5f23b1ce3ac438e7],
    [0x065c1ad6d376db4f, 0xe2447d6d5edfdda6, 0x0d4eba5c8c017781, 0x61ebca2110d736bf],
    [0xfea0bce10965b32b, 0x441e074b4573390c, 0xe9d6067a4cf3c571, 0x9ee43c7e3740bcd8],
    [0x0e06727b47ee6118, 0xb01ab631f2f10a18, 0xb0ebd9852fc780ef, 0xaa07010f9d42787c],
    [0x487ab1a6229d91f3, 0x7e2a3e36c6c822c7, 0x282c24f00c10930f, 0x2efe33f18332bb77],
    [0x346965f4dc5b5813, 0xed43ed38c0ce33e6, 0x9ba7630e295a5ce7, 0xa6db7142e0ca24ae],
    [0x24fb5abe38626c9c, 0xd32d71f71d7bd3de, 0x671d686fd9c9271d, 0xa3eec3cd6a795be8],
    [0x7b9c733c1f964b52, 0x9b988c0c238fb05e, 0xe546ccb8d6e1f9b8, 0xb101d668bfbf8ac8],
    [0xc219536a54552cae, 0xc4e4ad66027f8f55, 0xff31b23d5bc78184, 0x3b0fc03d5711c93d],
    [0x290e1c8bdb9441aa, 0x074e1694c800c130, 0xfa196a2583564700, 0x254eb32dea84e64d],
    [0xbe7381e2bce90a00, 0x2a72158dbf514e31, 0x44e199bee3498d4d, 0x6a5fed210720de58],
    [0xb55d63ee8d7a8468, 0x9ef5d413e3176666, 0x796c802ec3f1370b, 0xa0f422c35d7b6262],
];
