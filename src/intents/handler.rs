use super::{OrderSoupIntent, OrderSoupIntentResponse};
use crate::menu::{MenuLookup, MenuStore};
use crate::model::Order;
use crate::orders::OrderStore;
use log::info;
use std::sync::Arc;

/// Minutes quoted to the customer for a placed order.
pub const DEFAULT_WAIT_TIME_MINUTES: u32 = 10;

/// Answers "order soup" intents delivered by the voice assistant.
pub struct OrderSoupIntentHandler {
    menu: Arc<MenuStore>,
    orders: Arc<OrderStore>,
}

impl OrderSoupIntentHandler {
    pub fn new(menu: Arc<MenuStore>, orders: Arc<OrderStore>) -> Self {
        Self { menu, orders }
    }

    /// Final validation before the assistant asks the user to go ahead.
    pub fn confirm(&self, intent: &OrderSoupIntent) -> OrderSoupIntentResponse {
        let Some(soup) = intent.soup.as_ref() else {
            return OrderSoupIntentResponse::Failure;
        };
        let Some(menu_item) = soup
            .identifier
            .as_deref()
            .and_then(|identifier| self.menu.find_item(identifier))
        else {
            return OrderSoupIntentResponse::Failure;
        };

        if !menu_item.is_available() {
            return OrderSoupIntentResponse::FailureSoupUnavailable { soup: soup.clone() };
        }

        OrderSoupIntentResponse::Ready
    }

    /// Places the order described by `intent`.
    pub fn handle(&self, intent: &OrderSoupIntent) -> OrderSoupIntentResponse {
        let Some(soup) = intent.soup.clone() else {
            return OrderSoupIntentResponse::Failure;
        };
        let Some(order) = Order::from_intent(intent, self.menu.as_ref()) else {
            return OrderSoupIntentResponse::Failure;
        };

        info!(
            "placing order: {} x '{}'",
            order.quantity(),
            order.menu_item().item_name()
        );
        self.orders.place_order(order);

        OrderSoupIntentResponse::Success {
            soup,
            wait_time_minutes: DEFAULT_WAIT_TIME_MINUTES,
        }
    }
}
