use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A soup on the menu.
///
/// Identity is `item_name`: equality and hashing ignore every other field,
/// so a changed copy still replaces its original in a set. Stored items are
/// never edited in place; the `with_*` methods return a modified copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    item_name: String,
    shortcut_name_key: String,
    price: Decimal,
    icon_image_name: String,
    is_available: bool,
    is_daily_special: bool,
    #[serde(default)]
    items_in_stock: Option<u32>,
}

impl MenuItem {
    pub fn new(
        item_name: impl Into<String>,
        shortcut_name_key: impl Into<String>,
        price: Decimal,
        icon_image_name: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            shortcut_name_key: shortcut_name_key.into(),
            price,
            icon_image_name: icon_image_name.into(),
            is_available: true,
            is_daily_special: false,
            items_in_stock: None,
        }
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Localization key used for display and voice shortcut titles.
    pub fn shortcut_name_key(&self) -> &str {
        &self.shortcut_name_key
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn icon_image_name(&self) -> &str {
        &self.icon_image_name
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn is_daily_special(&self) -> bool {
        self.is_daily_special
    }

    pub fn items_in_stock(&self) -> Option<u32> {
        self.items_in_stock
    }

    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    pub fn with_daily_special(mut self, is_daily_special: bool) -> Self {
        self.is_daily_special = is_daily_special;
        self
    }

    pub fn with_stock(mut self, items_in_stock: Option<u32>) -> Self {
        self.items_in_stock = items_in_stock;
        self
    }

    /// Whether this item should be offered as a relevant voice shortcut.
    pub fn is_suggestable(&self) -> bool {
        self.is_daily_special && self.is_available
    }
}

impl PartialEq for MenuItem {
    fn eq(&self, other: &Self) -> bool {
        self.item_name == other.item_name
    }
}

impl Eq for MenuItem {}

impl Hash for MenuItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tomato() -> MenuItem {
        MenuItem::new("Tomato Soup", "TOMATO_SOUP", Decimal::new(295, 2), "tomato_soup")
    }

    #[test]
    fn test_identity_ignores_other_fields() {
        let available = tomato();
        let sold_out = tomato().with_availability(false).with_stock(Some(0));

        assert_eq!(available, sold_out);

        let mut menu = HashSet::new();
        menu.insert(available);
        assert!(!menu.insert(sold_out.clone()));
        assert!(menu.remove(&sold_out));
        assert!(menu.is_empty());
    }

    #[test]
    fn test_suggestable_requires_special_and_available() {
        assert!(!tomato().is_suggestable());
        assert!(tomato().with_daily_special(true).is_suggestable());
        assert!(
            !tomato()
                .with_daily_special(true)
                .with_availability(false)
                .is_suggestable()
        );
    }
}
