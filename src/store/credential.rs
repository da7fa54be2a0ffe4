use std::sync::Arc;

use tracing::warn;

use crate::store::PersistenceError;
use crate::store::kv::KeyValueStore;

pub const API_KEY_KEY: &str = "api_key";

/// The provider API key, kept apart from progress.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The stored key, trimmed. Blank or unreadable counts as absent.
    pub fn api_key(&self) -> Option<String> {
        match self.kv.get(API_KEY_KEY) {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read API key");
                None
            }
        }
    }

    pub fn set_api_key(&self, key: &str) -> Result<(), PersistenceError> {
        self.kv.set(API_KEY_KEY, key.trim())
    }

    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.kv.remove(API_KEY_KEY)
    }
}
