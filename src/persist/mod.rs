//! Generic key-scoped persisted collection.
//!
//! A [`PersistedCollection`] owns the in-memory copy of one value stored
//! under one key of a [`KeyValueStore`](crate::storage::KeyValueStore).
//! Reads and in-memory mutations go through the value lock; all store I/O
//! runs on a dedicated worker task, one job at a time, in the order the
//! jobs were scheduled.

mod collection;
mod events;
mod worker;

pub use collection::{CollectionValue, PersistedCollection};
pub use events::{ChangeOrigin, DataChanged};
