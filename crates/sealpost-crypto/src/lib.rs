//! `Sealpost` message envelopes.
//!
//! Signed, public-key encrypted and passphrase (PSK) encrypted messages with
//! every wire field in base64.
//!
//! ## Crypto primitives
//!
//! - **Signing**: Ed25519, attached (signature ‖ message) or detached
//! - **Box**: Ed25519 keys converted to X25519 → XSalsa20-Poly1305 (`crypto_box`)
//! - **PSK**: passphrase → 32-byte key → XSalsa20-Poly1305 (`secretbox`),
//!   legacy MD5 derivation by default, HKDF-SHA256 on request
//! - **Nonces**: 24 bytes from the OS CSPRNG, fresh on every encrypt call

pub mod codec;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod psk;
pub mod public_box;
pub mod signer;

pub use envelope::{Envelope, NONCE_SIZE};
pub use error::{CryptoError, Result};
pub use keys::{EncodedKeyPair, SigningKeyPair, create};
pub use psk::{PskCipher, decrypt_psk, encrypt_psk};
pub use public_box::{EncryptionKeyPair, decrypt, encrypt};
pub use signer::{sign, sign_detached, verify, verify_detached};
