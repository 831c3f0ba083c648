//! Cryptographically secure random bytes for keys and IVs.

use crate::error::{CryptoError, CryptoResult};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Source of key and IV material.
///
/// Production code uses [`OsRandom`]. Tests may substitute a source that
/// fails, to exercise error paths.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]) -> CryptoResult<()>;

    fn random_bytes(&self, len: usize) -> CryptoResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill_bytes(&mut buf)?;
        Ok(buf)
    }
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Random(e.to_string()))
    }
}
