//! Ed25519 message signing.
//!
//! Attached format: base64(signature ‖ message). Detached signatures carry
//! only the 64 signature bytes.

use ed25519_dalek::{SIGNATURE_LENGTH, Signature, Signer as _, Verifier as _};

use crate::codec::{decode_base64, decode_to_text, encode_base64};
use crate::error::Result;
use crate::keys::{SigningKeyPair, parse_public_key};

/// Sign `message` with a base64 private key, returning the attached signed
/// message in base64.
pub fn sign(message: &str, private_key_base64: &str) -> Result<String> {
    let keypair = SigningKeyPair::from_private_base64(private_key_base64)?;
    let signature = keypair.signing_key().sign(message.as_bytes());

    let mut signed = Vec::with_capacity(SIGNATURE_LENGTH + message.len());
    signed.extend_from_slice(&signature.to_bytes());
    signed.extend_from_slice(message.as_bytes());
    Ok(encode_base64(&signed))
}

/// Open an attached signed message against a base64 public key.
///
/// Returns `Ok(None)` when the signature does not verify. Errors are reserved
/// for malformed base64 or key input.
pub fn verify(signed_base64: &str, public_key_base64: &str) -> Result<Option<String>> {
    let signed = decode_base64(signed_base64)?;
    let verifying_key = parse_public_key(public_key_base64)?;

    if signed.len() < SIGNATURE_LENGTH {
        tracing::debug!(
            len = signed.len(),
            "signed message shorter than a signature"
        );
        return Ok(None);
    }
    let (signature_bytes, message) = signed.split_at(SIGNATURE_LENGTH);
    let Ok(signature) = Signature::from_slice(signature_bytes) else {
        return Ok(None);
    };

    match verifying_key.verify(message, &signature) {
        Ok(()) => Ok(Some(decode_to_text(message))),
        Err(e) => {
            tracing::debug!(error = %e, "signature verification failed");
            Ok(None)
        }
    }
}

/// Produce a detached base64 signature over `message`.
pub fn sign_detached(message: &str, private_key_base64: &str) -> Result<String> {
    let keypair = SigningKeyPair::from_private_base64(private_key_base64)?;
    let signature = keypair.signing_key().sign(message.as_bytes());
    Ok(encode_base64(&signature.to_bytes()))
}

/// Check a detached base64 signature over `message`.
pub fn verify_detached(
    message: &str,
    signature_base64: &str,
    public_key_base64: &str,
) -> Result<bool> {
    let signature_bytes = decode_base64(signature_base64)?;
    let verifying_key = parse_public_key(public_key_base64)?;
    // Wrong-length signatures are rejected by `from_slice`.
    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return Ok(false);
    };
    Ok(verifying_key.verify(message.as_bytes(), &signature).is_ok())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = SigningKeyPair::generate();
        let signed = sign("attack at dawn", &kp.private_base64()).unwrap();
        let opened = verify(&signed, &kp.public_base64()).unwrap();
        assert_eq!(opened.as_deref(), Some("attack at dawn"));
    }

    #[test]
    fn sign_verify_unicode_and_empty() {
        let kp = SigningKeyPair::generate();
        for message in ["", "grüße, 世界"] {
            let signed = sign(message, &kp.private_base64()).unwrap();
            let opened = verify(&signed, &kp.public_base64()).unwrap();
            assert_eq!(opened.as_deref(), Some(message));
        }
    }

    #[test]
    fn signed_message_is_signature_then_message() {
        let kp = SigningKeyPair::generate();
        let signed = decode_base64(&sign("hello", &kp.private_base64()).unwrap()).unwrap();
        assert_eq!(signed.len(), SIGNATURE_LENGTH + 5);
        assert_eq!(&signed[SIGNATURE_LENGTH..], b"hello");
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = SigningKeyPair::generate();
        let a = sign("same", &kp.private_base64()).unwrap();
        let b = sign("same", &kp.private_base64()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verify_with_unrelated_key_is_not_verified() {
        let kp = SigningKeyPair::generate();
        let stranger = SigningKeyPair::generate();
        let signed = sign("message", &kp.private_base64()).unwrap();
        assert_eq!(verify(&signed, &stranger.public_base64()).unwrap(), None);
    }

    #[test]
    fn verify_tampered_message_is_not_verified() {
        let kp = SigningKeyPair::generate();
        let mut signed = decode_base64(&sign("message", &kp.private_base64()).unwrap()).unwrap();
        if let Some(byte) = signed.last_mut() {
            *byte ^= 0x01;
        }
        let result = verify(&encode_base64(&signed), &kp.public_base64()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn verify_short_input_is_not_verified() {
        let kp = SigningKeyPair::generate();
        let result = verify(&encode_base64(&[0u8; 10]), &kp.public_base64()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn verify_rejects_malformed_base64() {
        let kp = SigningKeyPair::generate();
        let result = verify("***", &kp.public_base64());
        assert!(matches!(result, Err(CryptoError::Encoding(_))));
    }

    #[test]
    fn sign_rejects_wrong_key_length() {
        let result = sign("message", &encode_base64(&[0u8; 16]));
        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeyLength {
                expected: 64,
                actual: 16
            })
        ));
    }

    #[test]
    fn detached_roundtrip_and_mismatch() {
        let kp = SigningKeyPair::generate();
        let signature = sign_detached("payload", &kp.private_base64()).unwrap();
        assert_eq!(decode_base64(&signature).unwrap().len(), SIGNATURE_LENGTH);

        assert!(verify_detached("payload", &signature, &kp.public_base64()).unwrap());
        assert!(!verify_detached("payload!", &signature, &kp.public_base64()).unwrap());

        let stranger = SigningKeyPair::generate();
        assert!(!verify_detached("payload", &signature, &stranger.public_base64()).unwrap());

        let truncated = encode_base64(&[0u8; 63]);
        assert!(!verify_detached("payload", &truncated, &kp.public_base64()).unwrap());
    }

    #[test]
    fn detached_signature_matches_attached_prefix() {
        let kp = SigningKeyPair::generate();
        let detached = decode_base64(&sign_detached("m", &kp.private_base64()).unwrap()).unwrap();
        let attached = decode_base64(&sign("m", &kp.private_base64()).unwrap()).unwrap();
        assert_eq!(&attached[..SIGNATURE_LENGTH], detached.as_slice());
    }
}
