#![doc = "SM9 identity-based cryptography and the ShangMi primitives it builds on, for openHiTLS."]

// Core traits
pub mod provider;

// Hash algorithms
#[cfg(feature = "sm3")]
pub mod sm3;

// Symmetric ciphers
#[cfg(feature = "aes")]
pub mod aes;
#[cfg(feature = "sm4")]
pub mod sm4;

// Modes of operation
#[cfg(feature = "modes")]
pub mod modes;

// Identity-based cryptography
#[cfg(feature = "sm9")]
pub mod sm9;
