//! AES (Advanced Encryption Standard) block cipher implementation.
//!
//! Provides AES-128, AES-192, and AES-256 block cipher operations.
//! This module implements the low-level block encrypt/decrypt; for modes of
//! operation see the [`modes`](crate::modes) module.
//!
//! The S-boxes are derived at compile time from the GF(2^8) inverse and the
//! FIPS 197 affine map, so no lookup table is transcribed by hand.

use hitls_types::CryptoError;
use zeroize::Zeroize;

use crate::provider::BlockCipher;

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;

const MAX_ROUNDS: usize = 14;

const fn xtime(x: u8) -> u8 {
    (x << 1) ^ (((x >> 7) & 1) * 0x1b)
}

const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut acc = 0u8;
    while b != 0 {
        if b & 1 == 1 {
            acc ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    acc
}

const fn gf_inv(x: u8) -> u8 {
    // x^254 = x^-1, with 0 mapping to 0.
    let mut result = 1u8;
    let mut base = x;
    let mut e = 254u8;
    while e != 0 {
        if e & 1 == 1 {
            result = gf_mul(result, base);
        }
        base = gf_mul(base, base);
        e >>= 1;
    }
    if x == 0 {
        0
    } else {
        result
    }
}

const SBOX: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = gf_inv(i as u8);
        table[i] = b
            ^ b.rotate_left(1)
            ^ b.rotate_left(2)
            ^ b.rotate_left(3)
            ^ b.rotate_left(4)
            ^ 0x63;
        i += 1;
    }
    table
};

const INV_SBOX: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[SBOX[i] as usize] = i as u8;
        i += 1;
    }
    table
};

// State is column-major: byte (row, col) lives at index row + 4 * col.
const SHIFT_ROWS: [usize; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];
const INV_SHIFT_ROWS: [usize; 16] = [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3];

/// An AES key with precomputed round keys.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AesKey {
    round_keys: [[u8; AES_BLOCK_SIZE]; MAX_ROUNDS + 1],
    rounds: usize,
    key_len: usize,
}

fn expand_key(key: &[u8], nk: usize, rounds: usize) -> [[u8; AES_BLOCK_SIZE]; MAX_ROUNDS + 1] {
    let total = 4 * (rounds + 1);
    let mut words = [[0u8; 4]; 4 * (MAX_ROUNDS + 1)];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }
    let mut rcon = 1u8;
    for i in nk..total {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp = [
                SBOX[temp[1] as usize] ^ rcon,
                SBOX[temp[2] as usize],
                SBOX[temp[3] as usize],
                SBOX[temp[0] as usize],
            ];
            rcon = xtime(rcon);
        } else if nk > 6 && i % nk == 4 {
            for b in temp.iter_mut() {
                *b = SBOX[*b as usize];
            }
        }
        for j in 0..4 {
            words[i][j] = words[i - nk][j] ^ temp[j];
        }
    }

    let mut round_keys = [[0u8; AES_BLOCK_SIZE]; MAX_ROUNDS + 1];
    for (r, rk) in round_keys.iter_mut().enumerate().take(rounds + 1) {
        for c in 0..4 {
            rk[4 * c..4 * c + 4].copy_from_slice(&words[4 * r + c]);
        }
    }
    words.zeroize();
    round_keys
}

fn add_round_key(state: &mut [u8; AES_BLOCK_SIZE], rk: &[u8; AES_BLOCK_SIZE]) {
    for (s, k) in state.iter_mut().zip(rk) {
        *s ^= k;
    }
}

/// SubBytes followed by ShiftRows, done as one permuted lookup.
fn sub_shift(state: &mut [u8; AES_BLOCK_SIZE]) {
    let src = *state;
    for (dst, &idx) in state.iter_mut().zip(&SHIFT_ROWS) {
        *dst = SBOX[src[idx] as usize];
    }
}

fn inv_sub_shift(state: &mut [u8; AES_BLOCK_SIZE]) {
    let src = *state;
    for (dst, &idx) in state.iter_mut().zip(&INV_SHIFT_ROWS) {
        *dst = INV_SBOX[src[idx] as usize];
    }
}

fn mix_columns(state: &mut [u8; AES_BLOCK_SIZE]) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        let all = a0 ^ a1 ^ a2 ^ a3;
        col[0] ^= all ^ xtime(a0 ^ a1);
        col[1] ^= all ^ xtime(a1 ^ a2);
        col[2] ^= all ^ xtime(a2 ^ a3);
        col[3] ^= all ^ xtime(a3 ^ a0);
    }
}

fn inv_mix_columns(state: &mut [u8; AES_BLOCK_SIZE]) {
    for col in state.chunks_exact_mut(4) {
        let a = [col[0], col[1], col[2], col[3]];
        for row in 0..4 {
            col[row] = gf_mul(a[row], 0x0e)
                ^ gf_mul(a[(row + 1) % 4], 0x0b)
                ^ gf_mul(a[(row + 2) % 4], 0x0d)
                ^ gf_mul(a[(row + 3) % 4], 0x09);
        }
    }
}

impl AesKey {
    /// Create a new AES key from raw bytes.
    ///
    /// Accepts 16, 24, or 32-byte keys for AES-128, AES-192, and AES-256.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let nk = match key.len() {
            16 | 24 | 32 => key.len() / 4,
            _ => return Err(CryptoError::InvalidKey),
        };
        let rounds = nk + 6;
        Ok(Self {
            round_keys: expand_key(key, nk, rounds),
            rounds,
            key_len: key.len(),
        })
    }

    fn state_of(block: &[u8]) -> Result<[u8; AES_BLOCK_SIZE], CryptoError> {
        block
            .try_into()
            .map_err(|_| CryptoError::InvalidBlockLength)
    }

    /// Encrypt a single 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let mut s = Self::state_of(block)?;
        add_round_key(&mut s, &self.round_keys[0]);
        for r in 1..self.rounds {
            sub_shift(&mut s);
            mix_columns(&mut s);
            add_round_key(&mut s, &self.round_keys[r]);
        }
        sub_shift(&mut s);
        add_round_key(&mut s, &self.round_keys[self.rounds]);
        block.copy_from_slice(&s);
        Ok(())
    }

    /// Decrypt a single 16-byte block in place.
    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let mut s = Self::state_of(block)?;
        add_round_key(&mut s, &self.round_keys[self.rounds]);
        for r in (1..self.rounds).rev() {
            inv_sub_shift(&mut s);
            add_round_key(&mut s, &self.round_keys[r]);
            inv_mix_columns(&mut s);
        }
        inv_sub_shift(&mut s);
        add_round_key(&mut s, &self.round_keys[0]);
        block.copy_from_slice(&s);
        Ok(())
    }

    /// Return the key length in bytes.
    pub fn key_len(&self) -> usize {
        self.key_len
    }
}

impl BlockCipher for AesKey {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        AesKey::encrypt_block(self, block)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        AesKey::decrypt_block(self, block)
    }
}
