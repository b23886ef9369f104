//! Crypto error types.

/// Errors from envelope operations.
///
/// A signature that fails to verify is not an error: `verify` reports it as
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key conversion failed: {0}")]
    KeyConversion(String),

    #[error("Authentication failed: ciphertext, nonce or key mismatch")]
    Authentication,

    #[error("Invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for envelope operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
