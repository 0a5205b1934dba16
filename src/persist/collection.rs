use super::events::{ChangeOrigin, DataChanged};
use super::worker::{StoreJob, spawn_store_worker};
use crate::core::{BlobFormat, Result, SoupError};
use crate::storage::{CollectionConfig, KeyValueStore, Subscription};
use log::{debug, error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{Level, event};

/// Values a [`PersistedCollection`] can hold.
pub trait CollectionValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> CollectionValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// State shared between a collection handle, its store worker and its
/// store observer.
pub(crate) struct CollectionState<T> {
    pub(crate) key: String,
    pub(crate) format: BlobFormat,
    pub(crate) value: RwLock<T>,
    /// Set while the worker writes, so the store's echo of that write is ignored.
    pub(crate) ignore_local_changes: AtomicBool,
    pub(crate) store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<DataChanged>,
}

impl<T> CollectionState<T> {
    pub(crate) fn notify_changed(&self, origin: ChangeOrigin) {
        // No subscribers is fine.
        let _ = self.events.send(DataChanged {
            key: self.key.clone(),
            origin,
        });
    }
}

impl<T: CollectionValue> CollectionState<T> {
    /// Replaces the cached value with `bytes` written by another holder of
    /// the store. An undecodable blob leaves the cache untouched.
    fn reload_from(&self, bytes: &[u8]) {
        match self.format.decode::<T>(bytes) {
            Ok(value) => {
                {
                    let mut cached = self.value.write().unwrap_or_else(PoisonError::into_inner);
                    *cached = value;
                }
                event!(Level::DEBUG, key = %self.key, bytes = bytes.len(), "collection reloaded");
                self.notify_changed(ChangeOrigin::External);
            }
            Err(err) => {
                warn!("ignoring undecodable update to '{}': {}", self.key, err);
            }
        }
    }
}

/// Synchronised cache of one value persisted under one storage key.
///
/// The value is loaded when the collection is opened. Mutations update the
/// cache immediately and schedule an asynchronous write. Writes made by
/// other holders of the same store are applied to the cache inside the
/// store's change notification, so a mutation made after that notification
/// builds on the reloaded value. They are announced to subscribers as
/// [`ChangeOrigin::External`].
pub struct PersistedCollection<T> {
    state: Arc<CollectionState<T>>,
    jobs: mpsc::UnboundedSender<StoreJob>,
    subscription: Subscription,
    worker: JoinHandle<()>,
}

impl<T: CollectionValue> PersistedCollection<T> {
    /// Opens the collection stored under `key`.
    ///
    /// If the key holds no value, or holds one that cannot be decoded,
    /// `create_initial` supplies the value and it is written back right away.
    /// Must be called from within a tokio runtime.
    pub async fn open<F>(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        config: CollectionConfig,
        create_initial: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> T,
    {
        let key = key.into();
        let loaded = load_value::<T>(store.as_ref(), &key, config.format).await?;
        let needs_initial_write = loaded.is_none();
        let value = loaded.unwrap_or_else(create_initial);

        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let state = Arc::new(CollectionState {
            key,
            format: config.format,
            value: RwLock::new(value),
            ignore_local_changes: AtomicBool::new(false),
            store,
            events,
        });

        let (jobs, receiver) = mpsc::unbounded_channel();
        let worker = spawn_store_worker(state.clone(), receiver);

        if needs_initial_write {
            jobs.send(StoreJob::Persist)
                .map_err(|_| SoupError::WriterStopped(state.key.clone()))?;
        }

        let subscription = observe_store_changes(&state);

        Ok(Self {
            state,
            jobs,
            subscription,
            worker,
        })
    }

    /// Returns a copy of the current value.
    pub fn read(&self) -> T {
        self.with_read(T::clone)
    }

    /// Applies `f` to the current value under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self
            .state
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&*value)
    }

    /// Applies `f` to the cached value, then schedules a write.
    ///
    /// The change is visible to [`read`](Self::read) as soon as this returns;
    /// the store write happens later on the worker.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = {
            let mut value = self
                .state
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut *value)
        };
        self.persist();
        result
    }
}

impl<T> PersistedCollection<T> {
    pub fn key(&self) -> &str {
        &self.state.key
    }

    /// Schedules a write of the current value.
    ///
    /// Subscribers see exactly one [`ChangeOrigin::Local`] event once the
    /// write succeeds.
    pub fn persist(&self) {
        if self.jobs.send(StoreJob::Persist).is_err() {
            error!(
                "store worker for '{}' is gone; change stays in memory only",
                self.state.key
            );
        }
    }

    /// Receiver for this collection's change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DataChanged> {
        self.state.events.subscribe()
    }

    /// Waits until every job scheduled before this call has run.
    pub async fn flush(&self) -> Result<()> {
        let (done, finished) = oneshot::channel();
        self.jobs
            .send(StoreJob::Flush(done))
            .map_err(|_| SoupError::WriterStopped(self.state.key.clone()))?;
        finished
            .await
            .map_err(|_| SoupError::WriterStopped(self.state.key.clone()))
    }

    /// Stops observing the store, runs the pending jobs and joins the worker.
    pub async fn close(self) -> Result<()> {
        let Self {
            state,
            jobs,
            subscription,
            worker,
        } = self;

        drop(subscription);
        drop(jobs);

        worker
            .await
            .map_err(|err| SoupError::WriterStopped(format!("{}: {}", state.key, err)))?;
        debug!("collection '{}' closed", state.key);
        Ok(())
    }
}

/// Reads and decodes the value under `key`. A value that fails to decode is
/// reported and treated as absent.
pub(crate) async fn load_value<T: CollectionValue>(
    store: &dyn KeyValueStore,
    key: &str,
    format: BlobFormat,
) -> Result<Option<T>> {
    let Some(bytes) = store.get(key).await? else {
        return Ok(None);
    };

    match format.decode::<T>(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("discarding stored value for '{}': {}", key, err);
            Ok(None)
        }
    }
}

fn observe_store_changes<T: CollectionValue>(state: &Arc<CollectionState<T>>) -> Subscription {
    let weak_state = Arc::downgrade(state);

    state.store.observe(
        &state.key,
        Arc::new(move |_key: &str, bytes: &[u8]| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            if state.ignore_local_changes.load(Ordering::SeqCst) {
                return;
            }
            state.reload_from(bytes);
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_load_value_treats_garbage_as_absent() {
        let store = MemoryStore::new();
        store.set("numbers", b"garbage".to_vec()).await.unwrap();

        let loaded: Option<Vec<u32>> = load_value(&store, "numbers", BlobFormat::Json)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_close_runs_pending_writes() {
        let store = MemoryStore::new();
        let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());

        let numbers = PersistedCollection::open(
            shared,
            "numbers",
            CollectionConfig::new().format(BlobFormat::Json),
            || vec![1u32],
        )
        .await
        .unwrap();
        numbers.mutate(|values| values.push(2));
        numbers.close().await.unwrap();

        let bytes = store.get("numbers").await.unwrap().unwrap();
        let stored: Vec<u32> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stored, vec![1, 2]);
        assert_eq!(store.observer_count("numbers"), 0);
    }
}
