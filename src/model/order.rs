use super::MenuItem;
use crate::core::{Result, SoupError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

/// Toppings a soup can be ordered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuItemOption {
    #[serde(rename = "Cheese")]
    Cheese,
    #[serde(rename = "Red Pepper")]
    RedPepper,
    #[serde(rename = "Croutons")]
    Croutons,
}

impl MenuItemOption {
    pub const ALL: [MenuItemOption; 3] = [
        MenuItemOption::Cheese,
        MenuItemOption::RedPepper,
        MenuItemOption::Croutons,
    ];

    /// Stable identifier, also used by the intent schema.
    pub fn raw_value(&self) -> &'static str {
        match self {
            MenuItemOption::Cheese => "Cheese",
            MenuItemOption::RedPepper => "Red Pepper",
            MenuItemOption::Croutons => "Croutons",
        }
    }

    pub fn shortcut_localization_key(&self) -> &'static str {
        match self {
            MenuItemOption::Cheese => "CHEESE",
            MenuItemOption::RedPepper => "RED_PEPPER",
            MenuItemOption::Croutons => "CROUTONS",
        }
    }
}

impl fmt::Display for MenuItemOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_value())
    }
}

impl FromStr for MenuItemOption {
    type Err = SoupError;

    fn from_str(s: &str) -> Result<Self> {
        MenuItemOption::ALL
            .into_iter()
            .find(|option| option.raw_value() == s)
            .ok_or_else(|| SoupError::InvalidOrder(format!("unknown menu item option '{}'", s)))
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Unknown,
    Pickup,
    Delivery,
}

/// A named geographic location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Placemark {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_resolvable(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

fn resolvable(place: Placemark, role: &str) -> Result<Placemark> {
    if !place.is_resolvable() {
        return Err(SoupError::InvalidOrder(format!(
            "{} '{}' has non-finite coordinates ({}, {})",
            role, place.name, place.latitude, place.longitude
        )));
    }
    Ok(place)
}

/// A soup order.
///
/// Two orders are equal when they have the same menu item, quantity and
/// options. The identifier, date, order type and locations are not part of
/// equality, so repeated identical orders collapse into one suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    date: DateTime<Utc>,
    identifier: Uuid,
    menu_item: MenuItem,
    quantity: u32,
    menu_item_options: BTreeSet<MenuItemOption>,
    #[serde(default)]
    order_type: OrderType,
    #[serde(default)]
    delivery_location: Option<Placemark>,
    #[serde(default)]
    store_location: Option<Placemark>,
}

impl Order {
    pub fn new(
        quantity: u32,
        menu_item: MenuItem,
        menu_item_options: impl IntoIterator<Item = MenuItemOption>,
    ) -> Result<Self> {
        validate_quantity(quantity)?;
        Ok(Self {
            date: Utc::now(),
            identifier: Uuid::new_v4(),
            menu_item,
            quantity,
            menu_item_options: menu_item_options.into_iter().collect(),
            order_type: OrderType::Unknown,
            delivery_location: None,
            store_location: None,
        })
    }

    /// Pickup at `store`. Fails when the store has no usable coordinates.
    pub fn for_pickup(mut self, store: Placemark) -> Result<Self> {
        self.store_location = Some(resolvable(store, "store location")?);
        self.order_type = OrderType::Pickup;
        self.delivery_location = None;
        Ok(self)
    }

    /// Delivery to `destination`. Fails when the destination has no usable
    /// coordinates.
    pub fn for_delivery(mut self, destination: Placemark) -> Result<Self> {
        self.delivery_location = Some(resolvable(destination, "delivery location")?);
        self.order_type = OrderType::Delivery;
        self.store_location = None;
        Ok(self)
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn identifier(&self) -> Uuid {
        self.identifier
    }

    pub fn menu_item(&self) -> &MenuItem {
        &self.menu_item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn menu_item_options(&self) -> &BTreeSet<MenuItemOption> {
        &self.menu_item_options
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn delivery_location(&self) -> Option<&Placemark> {
        self.delivery_location.as_ref()
    }

    pub fn store_location(&self) -> Option<&Placemark> {
        self.store_location.as_ref()
    }

    /// Changes the quantity of an order that is still being edited.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<()> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Adds `option` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_option(&mut self, option: MenuItemOption) -> bool {
        if self.menu_item_options.remove(&option) {
            false
        } else {
            self.menu_item_options.insert(option);
            true
        }
    }

    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.menu_item.price()
    }
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(SoupError::InvalidOrder(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.menu_item == other.menu_item
            && self.quantity == other.quantity
            && self.menu_item_options == other.menu_item_options
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.menu_item.hash(state);
        self.quantity.hash(state);
        self.menu_item_options.hash(state);
    }
}
