use super::{ChangeCallback, KeyValueStore, ObserverRegistry, Subscription};
use crate::core::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-process key-value suite.
///
/// Clones share the same blobs and observers, so two managers holding
/// clones of one `MemoryStore` behave like two processes sharing an
/// app-group container.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    observers: ObserverRegistry,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn observer_count(&self, key: &str) -> usize {
        self.observers.observer_count(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.read()?;
        Ok(blobs.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        {
            let mut blobs = self.blobs.write()?;
            blobs.insert(key.to_string(), value.clone());
        }
        self.observers.notify(key, &value);
        Ok(())
    }

    fn observe(&self, key: &str, callback: ChangeCallback) -> Subscription {
        self.observers.register(key, callback)
    }
}
