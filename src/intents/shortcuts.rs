use super::OrderSoupIntent;
use crate::core::{Result, StorageKey};
use crate::menu::MenuLookup;
use crate::model::Order;
use crate::persist::PersistedCollection;
use crate::storage::{CollectionConfig, KeyValueStore};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A phrase the user recorded to replay an order intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceShortcut {
    pub identifier: Uuid,
    pub invocation_phrase: String,
    pub intent: OrderSoupIntent,
}

/// Where the user's recorded voice shortcuts live.
#[async_trait]
pub trait VoiceShortcutSource: Send + Sync {
    async fn all_voice_shortcuts(&self) -> Result<Vec<VoiceShortcut>>;
}

/// Last known list of voice shortcuts, shared through
/// [`StorageKey::VoiceShortcutHistory`].
pub struct VoiceShortcutIndex {
    shortcuts: PersistedCollection<Vec<VoiceShortcut>>,
    source: Arc<dyn VoiceShortcutSource>,
}

impl VoiceShortcutIndex {
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        config: CollectionConfig,
        source: Arc<dyn VoiceShortcutSource>,
    ) -> Result<Self> {
        let shortcuts = PersistedCollection::open(
            store,
            StorageKey::VoiceShortcutHistory,
            config,
            Vec::new,
        )
        .await?;
        Ok(Self { shortcuts, source })
    }

    /// Re-fetches the shortcuts. On failure the previous list is kept.
    ///
    /// Returns the number of shortcuts now known.
    pub async fn refresh(&self) -> usize {
        match self.source.all_voice_shortcuts().await {
            Ok(fetched) => {
                debug!("fetched {} voice shortcuts", fetched.len());
                self.shortcuts.mutate(|shortcuts| {
                    *shortcuts = fetched;
                    shortcuts.len()
                })
            }
            Err(err) => {
                warn!("failed to fetch voice shortcuts: {}", err);
                self.shortcuts.with_read(Vec::len)
            }
        }
    }

    pub fn voice_shortcuts(&self) -> Vec<VoiceShortcut> {
        self.shortcuts.read()
    }

    /// The shortcut whose intent describes the same order as `order`.
    pub fn voice_shortcut_for<M>(&self, order: &Order, menu: &M) -> Option<VoiceShortcut>
    where
        M: MenuLookup + ?Sized,
    {
        self.shortcuts.with_read(|shortcuts| {
            shortcuts
                .iter()
                .find(|shortcut| {
                    Order::from_intent(&shortcut.intent, menu).is_some_and(|known| known == *order)
                })
                .cloned()
        })
    }

    pub async fn flush(&self) -> Result<()> {
        self.shortcuts.flush().await
    }
}
