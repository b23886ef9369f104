//! Public-key authenticated encryption between signing identities.
//!
//! Ed25519 signing keys are converted on every call into X25519 keys
//! (Montgomery form of the public point, clamped SHA-512 scalar of the seed)
//! and used with the NaCl `crypto_box` construction (X25519 +
//! XSalsa20-Poly1305, 24-byte random nonce).

use crypto_box::aead::{Aead, Nonce};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use ed25519_dalek::VerifyingKey;
use zeroize::Zeroizing;

use crate::codec::{decode_base64, decode_to_text};
use crate::envelope::{Envelope, parse_nonce, random_nonce};
use crate::error::{CryptoError, Result};
use crate::keys::{PUBLIC_KEY_SIZE, SigningKeyPair};

/// X25519 keypair derived from a signing keypair. Never persisted.
pub struct EncryptionKeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl std::fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKeyPair")
            .field("public", &hex::encode(self.public.as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl EncryptionKeyPair {
    /// Derive both halves from a signing keypair.
    pub fn from_signing(keypair: &SigningKeyPair) -> Result<Self> {
        Ok(Self {
            secret: convert_secret(keypair),
            public: convert_public(&keypair.verifying_key())?,
        })
    }

    pub const fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub const fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

fn convert_secret(keypair: &SigningKeyPair) -> SecretKey {
    let mut scalar = Zeroizing::new(keypair.signing_key().to_scalar_bytes());
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    SecretKey::from(*scalar)
}

fn convert_public(verifying_key: &VerifyingKey) -> Result<PublicKey> {
    if verifying_key.is_weak() {
        return Err(CryptoError::KeyConversion(
            "public key is a small-order point".into(),
        ));
    }
    Ok(PublicKey::from(verifying_key.to_montgomery().to_bytes()))
}

/// Convert a base64 Ed25519 public key to its X25519 counterpart.
pub fn encryption_public_key(public_key_base64: &str) -> Result<PublicKey> {
    let bytes = decode_base64(public_key_base64)?;
    let arr: [u8; PUBLIC_KEY_SIZE] =
        bytes.as_slice().try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        })?;
    let verifying_key = VerifyingKey::from_bytes(&arr).map_err(|e| {
        CryptoError::KeyConversion(format!("public key is not a valid curve point: {e}"))
    })?;
    convert_public(&verifying_key)
}

/// Convert a base64 Ed25519 private key to its X25519 counterpart.
pub fn encryption_secret_key(private_key_base64: &str) -> Result<SecretKey> {
    let keypair = SigningKeyPair::from_private_base64(private_key_base64)?;
    Ok(convert_secret(&keypair))
}

/// Encrypt `message` from the sender's private key to the recipient's public
/// key under a fresh random nonce.
pub fn encrypt(
    message: &str,
    recipient_public_key_base64: &str,
    sender_private_key_base64: &str,
) -> Result<Envelope> {
    let nonce = random_nonce();
    let recipient = encryption_public_key(recipient_public_key_base64)?;
    let sender = encryption_secret_key(sender_private_key_base64)?;

    let salsa_box = SalsaBox::new(&recipient, &sender);
    let ciphertext = salsa_box
        .encrypt(Nonce::<SalsaBox>::from_slice(&nonce), message.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    tracing::debug!(len = ciphertext.len(), "sealed box");
    Ok(Envelope::from_parts(&ciphertext, &nonce))
}

/// Open a box produced by [`encrypt`].
///
/// Fails with [`CryptoError::Authentication`] on a wrong key, wrong nonce or
/// tampered ciphertext.
pub fn decrypt(
    message_base64: &str,
    nonce_base64: &str,
    sender_public_key_base64: &str,
    recipient_private_key_base64: &str,
) -> Result<String> {
    let sender = encryption_public_key(sender_public_key_base64)?;
    let recipient = encryption_secret_key(recipient_private_key_base64)?;
    let ciphertext = decode_base64(message_base64)?;
    let nonce = parse_nonce(nonce_base64)?;

    let salsa_box = SalsaBox::new(&sender, &recipient);
    let plaintext = Zeroizing::new(
        salsa_box
            .decrypt(Nonce::<SalsaBox>::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| {
                tracing::warn!(len = ciphertext.len(), "box failed to open");
                CryptoError::Authentication
            })?,
    );
    Ok(decode_to_text(&plaintext))
}
