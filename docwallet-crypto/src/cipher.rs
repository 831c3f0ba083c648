//! AES-256-CBC with PKCS7 padding.

use crate::envelope::build_envelope;
use crate::error::{CryptoError, CryptoResult};
use crate::key::DocumentKey;
use crate::random::RandomSource;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cipher::block_padding::Pkcs7;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

/// CBC initialization vector size in bytes.
pub const IV_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Base64-encoded IV and ciphertext, as carried by the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub iv: String,
    pub ciphertext: String,
}

impl EncryptedPayload {
    pub fn to_envelope(&self) -> String {
        build_envelope(&self.iv, &self.ciphertext)
    }
}

/// Encrypts `plaintext` under `key` with a fresh random IV.
pub fn encrypt(
    key: &DocumentKey,
    plaintext: &[u8],
    random: &dyn RandomSource,
) -> CryptoResult<EncryptedPayload> {
    let mut iv = [0u8; IV_SIZE];
    random.fill_bytes(&mut iv)?;

    let ciphertext = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    Ok(EncryptedPayload {
        iv: STANDARD.encode(iv),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Decrypts base64 `iv`/`ciphertext` under `key`.
///
/// Every failure, including malformed base64, maps to
/// [`CryptoError::Decryption`].
pub fn decrypt(key: &DocumentKey, iv: &str, ciphertext: &str) -> CryptoResult<Vec<u8>> {
    let iv = STANDARD.decode(iv).map_err(|_| CryptoError::Decryption)?;
    if iv.len() != IV_SIZE {
        return Err(CryptoError::Decryption);
    }
    let ciphertext = STANDARD
        .decode(ciphertext)
        .map_err(|_| CryptoError::Decryption)?;

    Aes256CbcDec::new_from_slices(key.as_bytes(), &iv)
        .map_err(|_| CryptoError::Decryption)?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CryptoError::Decryption)
}
