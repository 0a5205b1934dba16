//! Shared key-value storage.
//!
//! A [`KeyValueStore`] holds one opaque blob per string key and tells
//! registered observers whenever a key is written, passing the new blob.
//! Observers are invoked synchronously from inside [`KeyValueStore::set`],
//! before it returns, so a writer can recognise the echo of its own write.

pub mod config;
pub mod file;
pub mod memory;
pub mod observers;
pub mod watcher;

use crate::core::Result;
use async_trait::async_trait;

pub use config::CollectionConfig;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use observers::{ChangeCallback, ObserverRegistry, Subscription};
pub use watcher::FileWatcher;

/// A shared, process-external key-value persistence medium.
///
/// Used as `Arc<dyn KeyValueStore>`. Clones of a concrete store that share
/// the same backing suite stand in for separate processes observing one
/// app-group container.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the blob stored under `key`, or `None` if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key` and notifies every observer of `key` with it.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Registers `callback` for writes to `key`. The registration lasts as
    /// long as the returned [`Subscription`].
    fn observe(&self, key: &str, callback: ChangeCallback) -> Subscription;
}
