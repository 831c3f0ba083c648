//! Secure credential store abstraction.
//!
//! The platform keychain/keystore lives outside this crate. Consumers depend
//! on `Arc<dyn SecretStore>`; [`MemorySecretStore`] backs tests and embedded
//! use where no platform store exists.

use crate::error::CryptoResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Opaque secret storage keyed by service id.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Stores or replaces the secret for `service_id`.
    async fn set(&self, service_id: &str, secret: &str) -> CryptoResult<()>;

    /// Returns `None` when no secret exists for `service_id`.
    async fn get(&self, service_id: &str) -> CryptoResult<Option<String>>;

    /// Removes the secret. Deleting a missing entry is not an error.
    async fn delete(&self, service_id: &str) -> CryptoResult<()>;
}

/// In-process secret store.
#[derive(Clone, Default)]
pub struct MemorySecretStore {
    secrets: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, service_id: &str) -> bool {
        self.secrets.read().await.contains_key(service_id)
    }

    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn set(&self, service_id: &str, secret: &str) -> CryptoResult<()> {
        self.secrets
            .write()
            .await
            .insert(service_id.to_string(), secret.to_string());
        Ok(())
    }

    async fn get(&self, service_id: &str) -> CryptoResult<Option<String>> {
        Ok(self.secrets.read().await.get(service_id).cloned())
    }

    async fn delete(&self, service_id: &str) -> CryptoResult<()> {
        self.secrets.write().await.remove(service_id);
        Ok(())
    }
}
