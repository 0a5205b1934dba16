use super::collection::{CollectionState, CollectionValue};
use super::events::ChangeOrigin;
use log::error;
use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{Level, event};

/// Work for the store-access worker. Jobs run one at a time in send order.
pub(crate) enum StoreJob {
    /// Encode the cached value and write it to the store.
    Persist,
    /// Acknowledge once every earlier job has run.
    Flush(oneshot::Sender<()>),
}

/// Spawns the worker that owns all store I/O for one collection.
///
/// The worker exits once every job sender is gone, after running the jobs
/// still queued.
pub(crate) fn spawn_store_worker<T: CollectionValue>(
    state: Arc<CollectionState<T>>,
    mut jobs: mpsc::UnboundedReceiver<StoreJob>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = jobs.recv().await {
            match job {
                StoreJob::Persist => write_value(&state).await,
                StoreJob::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        event!(Level::DEBUG, key = %state.key, "store worker stopped");
    })
}

async fn write_value<T: CollectionValue>(state: &CollectionState<T>) {
    let encoded = {
        let value = state.value.read().unwrap_or_else(PoisonError::into_inner);
        state.format.encode(&*value)
    };

    // A value that cannot be encoded means the collection type itself is broken.
    let bytes = match encoded {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("could not save data for '{}': {}", state.key, err);
            panic!("could not save data for '{}': {}", state.key, err);
        }
    };
    let size = bytes.len();

    state.ignore_local_changes.store(true, Ordering::SeqCst);
    let result = state.store.set(&state.key, bytes).await;
    state.ignore_local_changes.store(false, Ordering::SeqCst);

    match result {
        Ok(()) => {
            event!(Level::DEBUG, key = %state.key, bytes = size, "collection persisted");
            state.notify_changed(ChangeOrigin::Local);
        }
        Err(err) => {
            event!(Level::ERROR, key = %state.key, error = %err, "collection write failed");
            error!("failed to write '{}': {}", state.key, err);
        }
    }
}
