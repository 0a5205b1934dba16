//! Order history, persisted under [`StorageKey::OrderHistory`].

use crate::core::{Result, StorageKey};
use crate::intents::{DonationCenter, spawn_best_effort};
use crate::model::Order;
use crate::persist::{DataChanged, PersistedCollection};
use crate::storage::{CollectionConfig, KeyValueStore};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Persisted list of placed orders, newest first.
pub struct OrderStore {
    collection: PersistedCollection<Vec<Order>>,
    donations: Arc<dyn DonationCenter>,
}

impl OrderStore {
    /// Opens the order history; an empty store starts with no orders.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        config: CollectionConfig,
        donations: Arc<dyn DonationCenter>,
    ) -> Result<Self> {
        let collection =
            PersistedCollection::open(store, StorageKey::OrderHistory, config, Vec::new).await?;
        Ok(Self {
            collection,
            donations,
        })
    }

    /// Records `order` as the most recent order and donates it so the voice
    /// assistant can suggest it again.
    pub fn place_order(&self, order: Order) {
        let intent = order.to_intent();
        self.collection.mutate(|history| history.insert(0, order));

        let donations = self.donations.clone();
        spawn_best_effort("donate order", async move { donations.donate(intent).await });
    }

    /// All placed orders, index 0 being the most recent.
    pub fn order_history(&self) -> Vec<Order> {
        self.collection.read()
    }

    pub fn latest_order(&self) -> Option<Order> {
        self.collection.with_read(|history| history.first().cloned())
    }

    pub fn len(&self) -> usize {
        self.collection.with_read(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataChanged> {
        self.collection.subscribe()
    }

    /// Waits for pending history writes.
    pub async fn flush(&self) -> Result<()> {
        self.collection.flush().await
    }

    pub async fn close(self) -> Result<()> {
        self.collection.close().await
    }
}
