//! Byte/text conversions used at every envelope boundary.
//!
//! - [`decode_to_text`]: best-effort multi-byte decoder for opened payloads
//! - [`encode_legacy16`]: legacy per-code-unit encoding feeding PSK derivation
//! - [`encode_base64`] / [`decode_base64`]: wire encoding of keys, nonces and
//!   ciphertexts

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Decoder position within a multi-byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Expecting a lead byte.
    Lead,
    /// Inside a 2- or 3-byte sequence, `remaining` continuation bytes left.
    Continuation { remaining: u8, unit: u16 },
}

/// Decode bytes as text, walking 1-, 2- and 3-byte sequences into UTF-16
/// code units.
///
/// Decoding never fails:
/// - continuation bytes contribute their low six bits without validation
/// - stray continuation bytes (`0x80..=0xBF`) and 4-byte leads (`0xF0..`) are
///   skipped
/// - a sequence cut short by the end of input is dropped
/// - unpaired surrogate code units become U+FFFD
pub fn decode_to_text(bytes: &[u8]) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut state = DecodeState::Lead;

    for &byte in bytes {
        state = match state {
            DecodeState::Lead => match byte >> 4 {
                0x0..=0x7 => {
                    units.push(u16::from(byte));
                    DecodeState::Lead
                }
                0xC | 0xD => DecodeState::Continuation {
                    remaining: 1,
                    unit: u16::from(byte & 0x1F),
                },
                0xE => DecodeState::Continuation {
                    remaining: 2,
                    unit: u16::from(byte & 0x0F),
                },
                _ => DecodeState::Lead,
            },
            DecodeState::Continuation { remaining, unit } => {
                let unit = (unit << 6) | u16::from(byte & 0x3F);
                if remaining == 1 {
                    units.push(unit);
                    DecodeState::Lead
                } else {
                    DecodeState::Continuation {
                        remaining: remaining - 1,
                        unit,
                    }
                }
            }
        };
    }

    if let DecodeState::Continuation { remaining, .. } = state {
        tracing::debug!(remaining, "dropping truncated multi-byte sequence");
    }

    String::from_utf16_lossy(&units)
}

/// Legacy passphrase encoding: every UTF-16 code unit narrowed to its low byte.
///
/// Only used to turn the PSK digest into key bytes. Must stay bit-exact with
/// deployed peers; not a general purpose text codec.
pub fn encode_legacy16(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .map(|unit| unit.to_le_bytes()[0])
        .collect()
}

/// Standard base64 (with padding).
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64, failing with [`CryptoError::Encoding`].
///
/// [`CryptoError::Encoding`]: crate::error::CryptoError::Encoding
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}
