#![allow(clippy::unwrap_used)] // Integration tests use unwrap for brevity

//! End-to-end envelope flows through the public API.
//!
//! Covers:
//! - keypair creation and reconstruction feeding sign/verify and box
//! - envelopes surviving a JSON hop between parties
//! - PSK cipher built from a config file
//! - concurrent encryption from many threads

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use sealpost_core::config::{Config, PskDerivation};
use sealpost_crypto::{
    CryptoError, Envelope, PskCipher, create, decrypt, decrypt_psk, encrypt, encrypt_psk, sign,
    verify,
};

#[test]
fn signed_then_boxed_message_flow() {
    let alice = create(None).unwrap();
    let bob = create(None).unwrap();

    // Alice restores her keys from the private half only.
    let restored = create(Some(&alice.private_key)).unwrap();
    assert_eq!(restored.public_key, alice.public_key);

    let signed = sign("meet at the pier", &restored.private_key).unwrap();
    let envelope = encrypt(&signed, &bob.public_key, &restored.private_key).unwrap();

    // Over the wire as JSON.
    let wire = envelope.to_json().unwrap();
    let received = Envelope::from_json(&wire).unwrap();

    let opened = decrypt(
        &received.message,
        &received.nonce,
        &alice.public_key,
        &bob.private_key,
    )
    .unwrap();
    assert_eq!(opened, signed);
    assert_eq!(
        verify(&opened, &alice.public_key).unwrap().as_deref(),
        Some("meet at the pier")
    );
    assert_eq!(verify(&opened, &bob.public_key).unwrap(), None);
}

#[test]
fn psk_cipher_from_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"psk": {"derivation": "hkdf-sha256"}}"#).unwrap();

    let config: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let cipher = PskCipher::from_config(&config.psk);
    assert_eq!(cipher.derivation(), PskDerivation::HkdfSha256);

    let envelope = cipher.encrypt("attack at dawn", "correct horse").unwrap();
    let opened = cipher
        .decrypt(&envelope.message, &envelope.nonce, "correct horse")
        .unwrap();
    assert_eq!(opened, "attack at dawn");

    let legacy = decrypt_psk(&envelope.message, &envelope.nonce, "correct horse");
    assert!(matches!(legacy, Err(CryptoError::Authentication)));
}

#[test]
fn psk_envelope_survives_json_hop() {
    let envelope = encrypt_psk("attack at dawn", "correct horse").unwrap();
    let received = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();

    assert_eq!(
        decrypt_psk(&received.message, &received.nonce, "correct horse").unwrap(),
        "attack at dawn"
    );
    assert!(matches!(
        decrypt_psk(&received.message, &received.nonce, "wrong horse"),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn concurrent_encryption_produces_unique_nonces() {
    let alice = Arc::new(create(None).unwrap());
    let bob = Arc::new(create(None).unwrap());
    let num_threads = 8;
    let per_thread = 50;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let alice = Arc::clone(&alice);
            let bob = Arc::clone(&bob);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|_| {
                        let boxed = encrypt("x", &bob.public_key, &alice.private_key).unwrap();
                        let psk = encrypt_psk("x", "pw").unwrap();
                        (boxed.nonce, psk.nonce)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut nonces = HashSet::new();
    for handle in handles {
        for (boxed, psk) in handle.join().unwrap() {
            assert!(nonces.insert(boxed), "nonce collision detected");
            assert!(nonces.insert(psk), "nonce collision detected");
        }
    }
    assert_eq!(nonces.len(), num_threads * per_thread * 2);
}
