use super::OrderSoupIntent;
use crate::core::Result;
use crate::model::MenuItem;
use async_trait::async_trait;
use log::{debug, warn};
use std::future::Future;

/// Voice assistant suggestion subsystem.
///
/// Calls are best effort: the stores run them in the background and only
/// log failures.
#[async_trait]
pub trait DonationCenter: Send + Sync {
    /// Records that the user placed the order described by `intent`.
    async fn donate(&self, intent: OrderSoupIntent) -> Result<()>;

    /// Forgets every donation made for the menu item `item_name`.
    async fn remove_donations(&self, item_name: &str) -> Result<()>;

    /// Replaces the set of menu items offered as relevant shortcuts.
    async fn suggest(&self, items: Vec<MenuItem>) -> Result<()>;
}

/// Donation center that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDonations;

#[async_trait]
impl DonationCenter for NoopDonations {
    async fn donate(&self, _intent: OrderSoupIntent) -> Result<()> {
        Ok(())
    }

    async fn remove_donations(&self, _item_name: &str) -> Result<()> {
        Ok(())
    }

    async fn suggest(&self, _items: Vec<MenuItem>) -> Result<()> {
        Ok(())
    }
}

/// Runs `task` in the background, logging its failure.
pub(crate) fn spawn_best_effort<F>(what: &'static str, task: F)
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!("{} skipped: no async runtime", what);
        return;
    };

    runtime.spawn(async move {
        match task.await {
            Ok(()) => debug!("{} succeeded", what),
            Err(err) => warn!("{} failed: {}", what, err),
        }
    });
}
