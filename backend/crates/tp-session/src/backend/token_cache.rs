use crate::FallbackStore;

use std::sync::{Arc, PoisonError, RwLock};

use log::warn;

/// Backend session token, optionally mirrored to a fallback store so it
/// survives restarts. Persistence failures are logged, never returned.
pub struct TokenCache {
    store: Option<(Arc<dyn FallbackStore>, String)>,
    token: RwLock<Option<String>>,
}

impl TokenCache {
    pub fn in_memory() -> Self {
        Self {
            store: None,
            token: RwLock::new(None),
        }
    }

    /// Load whatever token `key` already holds
    pub fn persistent(store: Arc<dyn FallbackStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let token = store.get(&key).unwrap_or_else(|e| {
            warn!("Could not read cached session token: {e}");
            None
        });

        Self {
            store: Some((store, key)),
            token: RwLock::new(token),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some((store, key)) = &self.store
            && let Err(e) = store.set(key, &token)
        {
            warn!("Could not persist session token: {e}");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        if let Some((store, key)) = &self.store
            && let Err(e) = store.remove(key)
        {
            warn!("Could not remove cached session token: {e}");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::in_memory()
    }
}
