//! Pre-shared-key envelopes.
//!
//! A passphrase is turned into a 32-byte key on every call and used with the
//! NaCl `secretbox` construction (XSalsa20-Poly1305, 24-byte random nonce).
//!
//! The default derivation is the legacy one: lowercase hex of MD5(passphrase)
//! passed through [`encode_legacy16`]. MD5 is weak and the encoding is
//! non-standard; both are kept bit-exact so deployed peers can still open our
//! envelopes. New deployments can select [`PskDerivation::HkdfSha256`].

use crypto_secretbox::XSalsa20Poly1305;
use crypto_secretbox::aead::{Aead, KeyInit, Nonce};
use hkdf::Hkdf;
use md5::{Digest, Md5};
use sealpost_core::config::{PskConfig, PskDerivation};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::codec::{decode_base64, decode_to_text, encode_legacy16};
use crate::envelope::{Envelope, parse_nonce, random_nonce};
use crate::error::{CryptoError, Result};

/// Secretbox key size.
pub const KEY_SIZE: usize = 32;

/// HKDF salt for passphrase key derivation.
const HKDF_SALT: &[u8] = b"sealpost-psk-hkdf-salt-v1";

/// HKDF info string for passphrase key derivation.
const HKDF_INFO: &[u8] = b"sealpost-psk-secretbox-v1";

/// Derive the legacy PSK key: MD5 hex digest through [`encode_legacy16`].
pub fn legacy_psk_key(passphrase: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let digest_hex = Zeroizing::new(hex::encode(Md5::digest(passphrase.as_bytes())));
    let encoded = Zeroizing::new(encode_legacy16(&digest_hex));
    let key: [u8; KEY_SIZE] = encoded.as_slice().try_into().map_err(|_| {
        CryptoError::KeyDerivationFailed(format!(
            "legacy key has {} bytes, expected {KEY_SIZE}",
            encoded.len()
        ))
    })?;
    Ok(Zeroizing::new(key))
}

/// Derive a PSK key with HKDF-SHA256 over the UTF-8 passphrase.
pub fn hkdf_psk_key(passphrase: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), passphrase.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    hk.expand(HKDF_INFO, key.as_mut_slice())
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
    Ok(key)
}

/// Secretbox encryption keyed by a passphrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PskCipher {
    derivation: PskDerivation,
}

impl PskCipher {
    pub const fn new(derivation: PskDerivation) -> Self {
        Self { derivation }
    }

    pub const fn from_config(config: &PskConfig) -> Self {
        Self::new(config.derivation)
    }

    pub const fn derivation(&self) -> PskDerivation {
        self.derivation
    }

    /// Derive the key bytes for `passphrase`. Never cached.
    pub fn derive_key(&self, passphrase: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
        match self.derivation {
            PskDerivation::Legacy => legacy_psk_key(passphrase),
            PskDerivation::HkdfSha256 => hkdf_psk_key(passphrase),
        }
    }

    fn cipher(&self, passphrase: &str) -> Result<XSalsa20Poly1305> {
        let key = self.derive_key(passphrase)?;
        XSalsa20Poly1305::new_from_slice(key.as_slice())
            .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))
    }

    /// Encrypt `message` under a fresh random nonce.
    pub fn encrypt(&self, message: &str, passphrase: &str) -> Result<Envelope> {
        let nonce = random_nonce();
        let cipher = self.cipher(passphrase)?;
        let ciphertext = cipher
            .encrypt(
                Nonce::<XSalsa20Poly1305>::from_slice(&nonce),
                message.as_bytes(),
            )
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        tracing::debug!(
            len = ciphertext.len(),
            derivation = ?self.derivation,
            "sealed secretbox"
        );
        Ok(Envelope::from_parts(&ciphertext, &nonce))
    }

    /// Open an envelope produced by [`PskCipher::encrypt`] with the same
    /// derivation.
    pub fn decrypt(
        &self,
        message_base64: &str,
        nonce_base64: &str,
        passphrase: &str,
    ) -> Result<String> {
        let ciphertext = decode_base64(message_base64)?;
        let nonce = parse_nonce(nonce_base64)?;
        let cipher = self.cipher(passphrase)?;

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::<XSalsa20Poly1305>::from_slice(&nonce),
                    ciphertext.as_slice(),
                )
                .map_err(|_| {
                    tracing::warn!(
                        len = ciphertext.len(),
                        derivation = ?self.derivation,
                        "secretbox failed to open"
                    );
                    CryptoError::Authentication
                })?,
        );
        Ok(decode_to_text(&plaintext))
    }
}

/// Encrypt `message` with the legacy passphrase derivation.
pub fn encrypt_psk(message: &str, passphrase: &str) -> Result<Envelope> {
    PskCipher::default().encrypt(message, passphrase)
}

/// Decrypt a legacy PSK envelope.
pub fn decrypt_psk(message_base64: &str, nonce_base64: &str, passphrase: &str) -> Result<String> {
    PskCipher::default().decrypt(message_base64, nonce_base64, passphrase)
}
