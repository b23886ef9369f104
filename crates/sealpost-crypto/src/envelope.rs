//! Encrypted envelope wire structure shared by box and PSK encryption.

use serde::{Deserialize, Serialize};

use crate::codec::encode_base64;
use crate::error::{CryptoError, Result};

/// Size of the XSalsa20 nonce used by both box and secretbox.
pub const NONCE_SIZE: usize = 24;

/// An encrypted message and the nonce it was sealed under, both base64.
///
/// Neither field is meaningful alone. No sender identity or timestamp is
/// carried; callers needing replay protection add it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    pub message: String,
    pub nonce: String,
}

impl Envelope {
    pub(crate) fn from_parts(ciphertext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Self {
        Self {
            message: encode_base64(ciphertext),
            nonce: encode_base64(nonce),
        }
    }

    /// Serialize to the `{"message": .., "nonce": ..}` JSON form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::Serialization(format!("Failed to serialize envelope: {e}")))
    }

    /// Parse the JSON form. Unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CryptoError::Serialization(format!("Failed to parse envelope: {e}")))
    }
}

/// Fill a fresh nonce from the OS CSPRNG.
pub(crate) fn random_nonce() -> [u8; NONCE_SIZE] {
    use rand::RngCore;

    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Decode and length-check a base64 nonce.
pub(crate) fn parse_nonce(nonce_base64: &str) -> Result<[u8; NONCE_SIZE]> {
    let bytes = crate::codec::decode_base64(nonce_base64)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: bytes.len(),
        })
}
