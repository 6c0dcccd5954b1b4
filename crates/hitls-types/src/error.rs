/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    // General errors
    #[error("null or empty input")]
    NullInput,
    #[error("invalid argument")]
    InvalidArg,
    #[error("operation not supported")]
    NotSupported,
    #[error("invalid key")]
    InvalidKey,
    #[error("failed to obtain randomness")]
    EntropyFailure,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // Symmetric cipher errors
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length")]
    InvalidIvLength,
    #[error("invalid input length: not a multiple of the block size")]
    InvalidBlockLength,
    #[error("invalid padding")]
    InvalidPadding,

    // SM9 errors
    #[error("sm9: invalid point encoding")]
    Sm9InvalidPoint,
    #[error("sm9: invalid scalar")]
    Sm9InvalidScalar,
    #[error("sm9: invalid gt encoding")]
    Sm9InvalidGt,
    #[error("sm9: decryption failed")]
    Sm9Decryption,
    #[error("sm9: plaintext is empty")]
    Sm9EmptyPlaintext,
    #[error("sm9: verification failed")]
    Sm9VerifyFail,
    #[error("sm9: key exchange called in wrong state")]
    Sm9StateError,
    #[error("sm9: degenerate user key, regenerate master key")]
    Sm9RegenerateMasterKey,

    // Encoding/Decoding errors
    #[error("decode: asn1 buffer failed")]
    DecodeAsn1Fail,
    #[error("decode: trailing data after asn1 structure")]
    DecodeTrailingData,
}
