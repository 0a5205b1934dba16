use super::FileStore;
use crate::core::{Result, SoupError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{Level, event};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Background task polling a [`FileStore`] directory for writes made by
/// other processes. Dropping the watcher aborts the task.
pub struct FileWatcher {
    stop_tx: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl FileWatcher {
    /// Signals the watcher to stop and waits for it to finish.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            join_handle
                .await
                .map_err(|err| SoupError::Storage(format!("file watcher join: {}", err)))?;
        }
        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
        }
    }
}

pub(super) fn spawn_file_watcher(store: FileStore, interval: Duration) -> FileWatcher {
    let interval = interval.max(MIN_POLL_INTERVAL);
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let join_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    break;
                }
                _ = sleep(interval) => {
                    let changed = store.poll_changes().await;
                    if changed > 0 {
                        event!(
                            Level::DEBUG,
                            root = %store.root().display(),
                            changed,
                            "external store changes detected"
                        );
                    }
                }
            }
        }
    });

    FileWatcher {
        stop_tx: Some(stop_tx),
        join_handle: Some(join_handle),
    }
}
