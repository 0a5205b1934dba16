#![allow(dead_code)]

use async_trait::async_trait;
use soupchef::{DonationCenter, KeyValueStore, MemoryStore, MenuItem, OrderSoupIntent, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// What a [`RecordingDonations`] saw.
#[derive(Debug, Clone)]
pub enum DonationEvent {
    Donated(OrderSoupIntent),
    Removed(String),
    Suggested(Vec<String>),
}

/// Donation center that forwards every call to a channel.
pub struct RecordingDonations {
    events: mpsc::UnboundedSender<DonationEvent>,
}

impl RecordingDonations {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<DonationEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { events }), receiver)
    }
}

#[async_trait]
impl DonationCenter for RecordingDonations {
    async fn donate(&self, intent: OrderSoupIntent) -> Result<()> {
        let _ = self.events.send(DonationEvent::Donated(intent));
        Ok(())
    }

    async fn remove_donations(&self, item_name: &str) -> Result<()> {
        let _ = self.events.send(DonationEvent::Removed(item_name.to_string()));
        Ok(())
    }

    async fn suggest(&self, items: Vec<MenuItem>) -> Result<()> {
        let names = items
            .iter()
            .map(|item| item.item_name().to_string())
            .collect();
        let _ = self.events.send(DonationEvent::Suggested(names));
        Ok(())
    }
}

/// Waits for the first event matching `wanted`, skipping others.
pub async fn wait_for<F>(
    receiver: &mut mpsc::UnboundedReceiver<DonationEvent>,
    wanted: F,
) -> DonationEvent
where
    F: Fn(&DonationEvent) -> bool,
{
    timeout(Duration::from_secs(2), async {
        loop {
            let event = receiver.recv().await.expect("donation channel closed");
            if wanted(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for donation event")
}

pub fn shared(store: &MemoryStore) -> Arc<dyn KeyValueStore> {
    Arc::new(store.clone())
}
