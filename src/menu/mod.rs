//! The soup menu, persisted under [`StorageKey::SoupMenu`].

mod sorting;

pub use sorting::localized_case_insensitive_cmp;

use crate::core::{Result, SoupError, StorageKey};
use crate::intents::{DonationCenter, spawn_best_effort};
use crate::model::MenuItem;
use crate::persist::{DataChanged, PersistedCollection};
use crate::storage::{CollectionConfig, KeyValueStore};
use rust_decimal::Decimal;
use sorting::sorted_by_name;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;

pub type SoupMenu = HashSet<MenuItem>;

/// Anything that can resolve a menu item by its identifier.
pub trait MenuLookup {
    fn find_item(&self, identifier: &str) -> Option<MenuItem>;
}

impl MenuLookup for SoupMenu {
    fn find_item(&self, identifier: &str) -> Option<MenuItem> {
        self.iter()
            .find(|item| item.item_name() == identifier)
            .cloned()
    }
}

/// Catalog written the first time the menu is opened on an empty store.
pub fn default_menu() -> SoupMenu {
    HashSet::from([
        MenuItem::new(
            "Chicken Noodle Soup",
            "CHICKEN_NOODLE_SOUP",
            Decimal::new(455, 2),
            "chicken_noodle_soup",
        )
        .with_daily_special(true),
        MenuItem::new(
            "Clam Chowder",
            "CLAM_CHOWDER",
            Decimal::new(375, 2),
            "clam_chowder",
        ),
        MenuItem::new(
            "Tomato Soup",
            "TOMATO_SOUP",
            Decimal::new(295, 2),
            "tomato_soup",
        ),
    ])
}

/// Persisted set of menu items with availability and daily-special views.
pub struct MenuStore {
    collection: PersistedCollection<SoupMenu>,
    donations: Arc<dyn DonationCenter>,
}

impl MenuStore {
    /// Opens the menu, seeding [`default_menu`] if the store has none.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        config: CollectionConfig,
        donations: Arc<dyn DonationCenter>,
    ) -> Result<Self> {
        let mut seeded = false;
        let collection = PersistedCollection::open(store, StorageKey::SoupMenu, config, || {
            seeded = true;
            default_menu()
        })
        .await?;

        let menu = Self {
            collection,
            donations,
        };
        if seeded {
            menu.update_suggestions();
        }
        Ok(menu)
    }

    pub fn all_items(&self) -> Vec<MenuItem> {
        self.filtered(|_| true)
    }

    pub fn available_items(&self) -> Vec<MenuItem> {
        self.filtered(MenuItem::is_available)
    }

    pub fn available_daily_special_items(&self) -> Vec<MenuItem> {
        self.filtered(|item| item.is_daily_special() && item.is_available())
    }

    pub fn daily_special_items(&self) -> Vec<MenuItem> {
        self.filtered(MenuItem::is_daily_special)
    }

    pub fn regular_items(&self) -> Vec<MenuItem> {
        self.filtered(|item| !item.is_daily_special())
    }

    pub fn available_regular_items(&self) -> Vec<MenuItem> {
        self.filtered(|item| !item.is_daily_special() && item.is_available())
    }

    /// Swaps `previous` for `replacement` and persists the menu.
    ///
    /// Donations for an item that is no longer available are withdrawn, and
    /// the suggested shortcuts are recomputed.
    pub fn replace_menu_item(&self, previous: &MenuItem, replacement: MenuItem) {
        let item_name = replacement.item_name().to_string();
        let withdraw = !replacement.is_available();

        self.collection.mutate(|menu| {
            menu.remove(previous);
            menu.replace(replacement);
        });

        if withdraw {
            let donations = self.donations.clone();
            spawn_best_effort("remove donations", async move {
                donations.remove_donations(&item_name).await
            });
        }
        self.update_suggestions();
    }

    /// Marks the item named `identifier` available or unavailable.
    pub fn set_availability(&self, identifier: &str, is_available: bool) -> Result<MenuItem> {
        let previous = self
            .find_item(identifier)
            .ok_or_else(|| SoupError::NotFound(identifier.to_string()))?;
        let replacement = previous.clone().with_availability(is_available);
        self.replace_menu_item(&previous, replacement.clone());
        Ok(replacement)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataChanged> {
        self.collection.subscribe()
    }

    /// Waits for pending menu writes.
    pub async fn flush(&self) -> Result<()> {
        self.collection.flush().await
    }

    pub async fn close(self) -> Result<()> {
        self.collection.close().await
    }

    fn filtered(&self, keep: impl Fn(&MenuItem) -> bool) -> Vec<MenuItem> {
        let items: Vec<MenuItem> = self
            .collection
            .with_read(|menu| menu.iter().filter(|&item| keep(item)).cloned().collect());
        sorted_by_name(items)
    }

    fn update_suggestions(&self) {
        let items = self.available_daily_special_items();
        let donations = self.donations.clone();
        spawn_best_effort("suggest shortcuts", async move {
            donations.suggest(items).await
        });
    }
}

impl MenuLookup for MenuStore {
    fn find_item(&self, identifier: &str) -> Option<MenuItem> {
        self.collection.with_read(|menu| menu.find_item(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_contents() {
        let menu = default_menu();
        assert_eq!(menu.len(), 3);

        let special = menu.find_item("Chicken Noodle Soup").unwrap();
        assert!(special.is_daily_special());
        assert_eq!(special.price(), Decimal::new(455, 2));

        assert!(menu.iter().all(MenuItem::is_available));
        assert!(menu.find_item("Minestrone").is_none());
    }
}
