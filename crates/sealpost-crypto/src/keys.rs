//! Signing keypair management.
//!
//! Keys travel as base64 of the raw NaCl layouts: 32-byte Ed25519 public key,
//! 64-byte private key (seed followed by the public key).

use ed25519_dalek::{KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::codec::{decode_base64, encode_base64};
use crate::error::{CryptoError, Result};

/// Length of a serialized private key (seed ‖ public key).
pub const PRIVATE_KEY_SIZE: usize = KEYPAIR_LENGTH;

/// Length of a serialized public key.
pub const PUBLIC_KEY_SIZE: usize = PUBLIC_KEY_LENGTH;

/// Portable form of a signing keypair, both halves base64-encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedKeyPair {
    #[serde(rename = "publickey")]
    pub public_key: String,
    #[serde(rename = "privatekey")]
    pub private_key: String,
}

impl std::fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// An Ed25519 signing keypair.
///
/// The secret half is zeroed when the keypair is dropped.
pub struct SigningKeyPair {
    signing: SigningKey,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("public", &hex::encode(self.public_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SigningKeyPair {
    /// Generate a new random keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Reconstruct from raw 64-byte private key bytes.
    ///
    /// Rejects keys whose embedded public half does not match the seed.
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        let arr = Zeroizing::new(arr);
        let signing = SigningKey::from_keypair_bytes(&arr).map_err(|e| {
            CryptoError::InvalidKey(format!("public half does not match seed: {e}"))
        })?;
        Ok(Self { signing })
    }

    /// Reconstruct from a base64-encoded private key.
    pub fn from_private_base64(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_base64(encoded)?);
        Self::from_private_bytes(&bytes)
    }

    /// Get the public key as raw bytes.
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.signing.verifying_key().to_bytes()
    }

    /// Get the private key as raw bytes. Handle with care.
    pub fn private_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.signing.to_keypair_bytes())
    }

    pub fn public_base64(&self) -> String {
        encode_base64(&self.public_bytes())
    }

    pub fn private_base64(&self) -> String {
        encode_base64(self.private_bytes().as_slice())
    }

    /// Both halves in their portable form.
    pub fn encoded(&self) -> EncodedKeyPair {
        EncodedKeyPair {
            public_key: self.public_base64(),
            private_key: self.private_base64(),
        }
    }

    pub(crate) const fn signing_key(&self) -> &SigningKey {
        &self.signing
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }
}

/// Create a keypair, reconstructing it when a base64 private key is given and
/// generating a fresh one otherwise.
pub fn create(private_key_base64: Option<&str>) -> Result<EncodedKeyPair> {
    let keypair = match private_key_base64 {
        Some(encoded) => SigningKeyPair::from_private_base64(encoded)?,
        None => {
            tracing::debug!("generating new signing keypair");
            SigningKeyPair::generate()
        }
    };
    Ok(keypair.encoded())
}

/// Parse a base64 public key into a verifying key.
///
/// Fails with [`CryptoError::InvalidKeyLength`] for anything but 32 bytes and
/// with [`CryptoError::InvalidKey`] when the bytes are not a curve point.
pub fn parse_public_key(encoded: &str) -> Result<VerifyingKey> {
    let bytes = decode_base64(encoded)?;
    let arr: [u8; PUBLIC_KEY_SIZE] =
        bytes.as_slice().try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        })?;
    VerifyingKey::from_bytes(&arr)
        .map_err(|e| CryptoError::InvalidKey(format!("public key is not a curve point: {e}")))
}
