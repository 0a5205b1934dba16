use super::{IntentImage, IntentObject, OrderSoupIntent};
use crate::menu::MenuLookup;
use crate::model::{MenuItemOption, Order, OrderType};

/// Localization key of the phrase suggested when recording a shortcut.
pub const SUGGESTED_INVOCATION_PHRASE_KEY: &str = "ORDER_SOUP_SUGGESTED_PHRASE";

impl Order {
    /// Describes this order as an "order soup" intent.
    pub fn to_intent(&self) -> OrderSoupIntent {
        let menu_item = self.menu_item();
        let options = self
            .menu_item_options()
            .iter()
            .map(|option| IntentObject::new(option.raw_value(), option.shortcut_localization_key()))
            .collect();

        OrderSoupIntent {
            soup: Some(IntentObject::new(
                menu_item.item_name(),
                menu_item.shortcut_name_key(),
            )),
            quantity: Some(self.quantity()),
            options: Some(options),
            order_type: self.order_type(),
            delivery_location: self.delivery_location().cloned(),
            store_location: self.store_location().cloned(),
            soup_image: Some(IntentImage {
                name: menu_item.icon_image_name().to_string(),
            }),
            suggested_invocation_phrase: Some(SUGGESTED_INVOCATION_PHRASE_KEY.to_string()),
        }
    }

    /// Rebuilds an order from an intent, resolving the soup through `menu`.
    ///
    /// Returns `None` when the soup is unknown, the quantity is missing or
    /// zero, or a pickup/delivery intent lacks a location with finite
    /// coordinates. Options that do not name a known topping are dropped.
    pub fn from_intent<M>(intent: &OrderSoupIntent, menu: &M) -> Option<Order>
    where
        M: MenuLookup + ?Sized,
    {
        let soup_id = intent.soup.as_ref()?.identifier.as_deref()?;
        let menu_item = menu.find_item(soup_id)?;
        let quantity = intent.quantity?;

        let options = intent
            .options
            .iter()
            .flatten()
            .filter_map(|option| option.identifier.as_deref())
            .filter_map(|identifier| identifier.parse::<MenuItemOption>().ok());

        let order = Order::new(quantity, menu_item, options).ok()?;

        match intent.order_type {
            OrderType::Unknown => Some(order),
            OrderType::Pickup => order.for_pickup(intent.store_location.clone()?).ok(),
            OrderType::Delivery => order.for_delivery(intent.delivery_location.clone()?).ok(),
        }
    }
}
