//! The on-disk encrypted file format.
//!
//! An envelope is a single text blob: `DWENC2:<iv-base64>:<ciphertext-base64>`.
//! Base64 never contains `:`, so the split is unambiguous. Anything that is not
//! exactly three non-empty segments led by the tag is rejected outright; a
//! malformed envelope is never partially interpreted.

use crate::cipher::EncryptedPayload;
use crate::error::{CryptoError, CryptoResult};

/// Leading tag of the current envelope version.
pub const ENVELOPE_TAG: &str = "DWENC2";

pub fn build_envelope(iv: &str, ciphertext: &str) -> String {
    format!("{ENVELOPE_TAG}:{iv}:{ciphertext}")
}

pub fn parse_envelope(text: &str) -> CryptoResult<EncryptedPayload> {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [tag, iv, ciphertext] if *tag == ENVELOPE_TAG && !iv.is_empty() && !ciphertext.is_empty() => {
            Ok(EncryptedPayload {
                iv: (*iv).to_string(),
                ciphertext: (*ciphertext).to_string(),
            })
        }
        _ => Err(CryptoError::InvalidEnvelope),
    }
}
