//! String-keyed persistent storage the site configuration lives in

use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::Mutex;

pub const PROMPT_KEY: &str = "fareapp_chatbot_prompt";
pub const TEMPLATES_KEY: &str = "fareapp_templates";
pub const LOGO_KEY: &str = "fareapp_site_logo";
pub const PLAY_STORE_KEY: &str = "fareapp_play_store_url";
pub const APP_STORE_KEY: &str = "fareapp_app_store_url";

/// Synchronous key-value storage that survives restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removes every key.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Other("memory store lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.get(PROMPT_KEY).unwrap(), None);
        store.set(PROMPT_KEY, "hello").unwrap();
        store.set(PROMPT_KEY, "hello again").unwrap();
        assert_eq!(store.get(PROMPT_KEY).unwrap().as_deref(), Some("hello again"));
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
