//! Query-string encoding of event objects.
//!
//! Events sent through a script URL are JSON, base64-encoded with the
//! standard alphabet except `+` becomes `_` and `/` becomes `-`, and without
//! trailing padding. Note this swaps the two characters relative to the
//! RFC 4648 URL-safe alphabet.

use base64::alphabet::Alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{CoreError, Result};

const EVENT_ALPHABET: Alphabet =
    match Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid event alphabet"),
    };

const EVENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &EVENT_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes for the `event` query parameter.
pub fn encode_event(bytes: &[u8]) -> String {
    EVENT_ENGINE.encode(bytes)
}

/// Decode an `event` query parameter back to bytes.
pub fn decode_event(encoded: &str) -> Result<Vec<u8>> {
    EVENT_ENGINE
        .decode(encoded)
        .map_err(|e| CoreError::Decoding(e.to_string()))
}
