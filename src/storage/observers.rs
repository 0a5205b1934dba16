use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with the key that changed and the blob now stored there.
pub type ChangeCallback = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    observers: HashMap<u64, (String, ChangeCallback)>,
}

/// Per-key observer bookkeeping shared by the store implementations.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, key: &str, callback: ChangeCallback) -> Subscription {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let id = state.next_id;
        state.next_id += 1;
        state.observers.insert(id, (key.to_string(), callback));

        Subscription {
            registry: Arc::downgrade(&self.state),
            id,
            key: key.to_string(),
        }
    }

    /// Invokes every callback registered for `key` with the new `value`.
    ///
    /// Callbacks are collected first and run without the registry lock held,
    /// so a callback may register or drop subscriptions itself.
    pub fn notify(&self, key: &str, value: &[u8]) {
        let callbacks: Vec<ChangeCallback> = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state
                .observers
                .values()
                .filter(|(observed, _)| observed == key)
                .map(|(_, callback)| callback.clone())
                .collect()
        };

        for callback in callbacks {
            callback(key, value);
        }
    }

    /// Distinct keys that currently have at least one observer.
    pub fn observed_keys(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = state
            .observers
            .values()
            .map(|(observed, _)| observed.clone())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn observer_count(&self, key: &str) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .observers
            .values()
            .filter(|(observed, _)| observed == key)
            .count()
    }
}

/// Handle for a registered observer. Dropping it stops the observation.
pub struct Subscription {
    registry: Weak<Mutex<RegistryState>>,
    id: u64,
    key: String,
}

impl Subscription {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.registry.upgrade() {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.observers.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}
