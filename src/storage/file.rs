use super::watcher::{FileWatcher, spawn_file_watcher};
use super::{ChangeCallback, KeyValueStore, ObserverRegistry, Subscription};
use crate::core::{Result, SoupError};
use async_trait::async_trait;
use log::warn;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Directory-backed key-value suite: one `<key>.blob` file per key.
///
/// Writes made through this store (or its clones) notify observers
/// immediately. Writes made by other processes sharing the directory are
/// picked up by [`FileStore::poll_changes`], which [`FileStore::watch`] runs
/// on an interval.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    observers: ObserverRegistry,
    /// Last blob this store saw per key; `None` records an absent file.
    known: Arc<Mutex<HashMap<String, Option<Vec<u8>>>>>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            observers: ObserverRegistry::new(),
            known: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a background task that calls [`poll_changes`](Self::poll_changes)
    /// every `interval`. Must be called from within a tokio runtime.
    pub fn watch(&self, interval: Duration) -> FileWatcher {
        spawn_file_watcher(self.clone(), interval)
    }

    /// Re-reads every observed key and notifies its observers when the file
    /// differs from the last blob this store saw. Returns the number of keys
    /// that changed.
    ///
    /// The first poll of a key only records its current content.
    pub async fn poll_changes(&self) -> usize {
        let mut changed = Vec::new();
        {
            let mut known = self.known.lock().await;
            for key in self.observers.observed_keys() {
                let current = match self.read_blob(&key).await {
                    Ok(current) => current,
                    Err(err) => {
                        warn!("skipping change check for '{}': {}", key, err);
                        continue;
                    }
                };

                match known.get(&key) {
                    None => {
                        known.insert(key, current);
                    }
                    Some(previous) if *previous == current => {}
                    Some(_) => {
                        known.insert(key.clone(), current.clone());
                        if let Some(bytes) = current {
                            changed.push((key, bytes));
                        }
                    }
                }
            }
        }

        for (key, bytes) in &changed {
            self.observers.notify(key, bytes);
        }
        changed.len()
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
            return Err(SoupError::Storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.blob", key)))
    }

    async fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error("read", &path, err)),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut known = self.known.lock().await;
        let current = self.read_blob(key).await?;
        known
            .entry(key.to_string())
            .or_insert_with(|| current.clone());
        Ok(current)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.blob_path(key)?;
        {
            let mut known = self.known.lock().await;
            replace_file(&path, &value).await?;
            known.insert(key.to_string(), Some(value.clone()));
        }
        self.observers.notify(key, &value);
        Ok(())
    }

    fn observe(&self, key: &str, callback: ChangeCallback) -> Subscription {
        self.observers.register(key, callback)
    }
}

/// Writes `bytes` to a uniquely named sibling file, syncs it and renames it
/// over `path`, so concurrent readers in other processes never see a partial
/// blob.
async fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .await
        .map_err(|err| storage_error("create directory", dir, err))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("blob");
    let staging = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let written = async {
        let mut file = fs::File::create(&staging).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&staging, path).await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(err) = written {
        let _ = fs::remove_file(&staging).await;
        return Err(storage_error("replace", path, err));
    }
    Ok(())
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> SoupError {
    SoupError::Storage(format!("failed to {} '{}': {}", action, path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("suite"));

        assert!(store.get("soupMenu").await.unwrap().is_none());
        store.set("soupMenu", b"menu".to_vec()).await.unwrap();

        let reopened = FileStore::new(temp_dir.path().join("suite"));
        assert_eq!(reopened.get("soupMenu").await.unwrap(), Some(b"menu".to_vec()));

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("suite"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["soupMenu.blob".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.set("../escape", vec![1]).await.is_err());
        assert!(store.set(".hidden", vec![1]).await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_poll_sees_writes_from_another_store() {
        let temp_dir = TempDir::new().unwrap();
        let app = FileStore::new(temp_dir.path());
        let extension = FileStore::new(temp_dir.path());

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_callback = hits.clone();
        let _subscription = app.observe(
            "orderHistory",
            Arc::new(move |_key: &str, value: &[u8]| {
                assert_eq!(value, b"two");
                hits_in_callback.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // Missing file becomes the baseline.
        assert_eq!(app.poll_changes().await, 0);

        extension.set("orderHistory", b"two".to_vec()).await.unwrap();
        assert_eq!(app.poll_changes().await, 1);
        assert_eq!(app.poll_changes().await, 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_skips_own_writes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_callback = hits.clone();
        let _subscription = store.observe(
            "soupMenu",
            Arc::new(move |_key: &str, _value: &[u8]| {
                hits_in_callback.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set("soupMenu", b"menu".to_vec()).await.unwrap();
        assert_eq!(store.poll_changes().await, 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
