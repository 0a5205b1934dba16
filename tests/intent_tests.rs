/// Intent tests
///
/// Order <-> intent conversion, the intent handler and voice shortcut lookup.
/// Run with: cargo test --test intent_tests

mod common;

use async_trait::async_trait;
use common::shared;
use soupchef::intents::DEFAULT_WAIT_TIME_MINUTES;
use soupchef::{
    CollectionConfig, IntentObject, MemoryStore, MenuItemOption, MenuLookup, MenuStore,
    NoopDonations, Order, OrderSoupIntent, OrderSoupIntentHandler, OrderSoupIntentResponse,
    OrderStore, OrderType, Placemark, Result, SoupError, VoiceShortcut, VoiceShortcutIndex,
    VoiceShortcutSource,
};
use std::sync::Arc;
use std::sync::Mutex;
use uuid::Uuid;

async fn open_stores(store: &MemoryStore) -> (Arc<MenuStore>, Arc<OrderStore>) {
    let menu = MenuStore::open(shared(store), CollectionConfig::new(), Arc::new(NoopDonations))
        .await
        .unwrap();
    let orders = OrderStore::open(shared(store), CollectionConfig::new(), Arc::new(NoopDonations))
        .await
        .unwrap();
    (Arc::new(menu), Arc::new(orders))
}

fn order_for(menu: &MenuStore, name: &str, quantity: u32, options: &[MenuItemOption]) -> Order {
    let item = menu.find_item(name).unwrap();
    Order::new(quantity, item, options.iter().copied()).unwrap()
}

#[tokio::test]
async fn test_round_trip_through_intent() {
    let store = MemoryStore::new();
    let (menu, _orders) = open_stores(&store).await;

    let option_sets: [&[MenuItemOption]; 3] = [
        &[],
        &[MenuItemOption::Cheese],
        &[MenuItemOption::RedPepper, MenuItemOption::Croutons, MenuItemOption::Cheese],
    ];

    for item in menu.all_items() {
        for (quantity, options) in (1..).zip(option_sets) {
            let order = order_for(&menu, item.item_name(), quantity, options);
            let restored = Order::from_intent(&order.to_intent(), menu.as_ref());
            assert_eq!(restored, Some(order));
        }
    }
}

#[tokio::test]
async fn test_round_trip_keeps_pickup_location() {
    let store = MemoryStore::new();
    let (menu, _orders) = open_stores(&store).await;

    let shop = Placemark::new("Soup Chef Cupertino", 37.3349, -122.0090);
    let order = order_for(&menu, "Tomato Soup", 1, &[])
        .for_pickup(shop.clone())
        .unwrap();

    let restored = Order::from_intent(&order.to_intent(), menu.as_ref()).unwrap();
    assert_eq!(restored.order_type(), OrderType::Pickup);
    assert_eq!(restored.store_location(), Some(&shop));
    assert!(restored.delivery_location().is_none());
}

#[tokio::test]
async fn test_from_intent_rejects_incomplete_intents() {
    let store = MemoryStore::new();
    let (menu, _orders) = open_stores(&store).await;
    let valid = order_for(&menu, "Clam Chowder", 2, &[]).to_intent();

    let mut no_quantity = valid.clone();
    no_quantity.quantity = None;
    assert!(Order::from_intent(&no_quantity, menu.as_ref()).is_none());

    let mut unknown_soup = valid.clone();
    unknown_soup.soup = Some(IntentObject::new("Gazpacho", "GAZPACHO"));
    assert!(Order::from_intent(&unknown_soup, menu.as_ref()).is_none());

    let mut no_soup = valid.clone();
    no_soup.soup = None;
    assert!(Order::from_intent(&no_soup, menu.as_ref()).is_none());

    let mut pickup_without_store = valid.clone();
    pickup_without_store.order_type = OrderType::Pickup;
    assert!(Order::from_intent(&pickup_without_store, menu.as_ref()).is_none());

    let mut delivery_without_address = valid.clone();
    delivery_without_address.order_type = OrderType::Delivery;
    delivery_without_address.store_location = Some(Placemark::new("Shop", 1.0, 2.0));
    assert!(Order::from_intent(&delivery_without_address, menu.as_ref()).is_none());

    let mut unresolvable_address = valid;
    unresolvable_address.order_type = OrderType::Delivery;
    unresolvable_address.delivery_location = Some(Placemark::new("Nowhere", f64::NAN, 0.0));
    assert!(Order::from_intent(&unresolvable_address, menu.as_ref()).is_none());
}

#[tokio::test]
async fn test_confirm_checks_availability() {
    let store = MemoryStore::new();
    let (menu, orders) = open_stores(&store).await;
    let handler = OrderSoupIntentHandler::new(menu.clone(), orders);

    let intent = order_for(&menu, "Tomato Soup", 1, &[]).to_intent();
    assert_eq!(handler.confirm(&intent), OrderSoupIntentResponse::Ready);

    menu.set_availability("Tomato Soup", false).unwrap();
    assert_eq!(
        handler.confirm(&intent),
        OrderSoupIntentResponse::FailureSoupUnavailable {
            soup: intent.soup.clone().unwrap()
        }
    );

    let unknown = OrderSoupIntent {
        soup: Some(IntentObject::new("Gazpacho", "GAZPACHO")),
        quantity: Some(1),
        ..Default::default()
    };
    assert_eq!(handler.confirm(&unknown), OrderSoupIntentResponse::Failure);
    assert_eq!(
        handler.confirm(&OrderSoupIntent::default()),
        OrderSoupIntentResponse::Failure
    );
}

#[tokio::test]
async fn test_handle_places_order() {
    let store = MemoryStore::new();
    let (menu, orders) = open_stores(&store).await;
    let handler = OrderSoupIntentHandler::new(menu.clone(), orders.clone());

    let order = order_for(&menu, "Chicken Noodle Soup", 2, &[MenuItemOption::Cheese]);
    let intent = order.to_intent();

    let response = handler.handle(&intent);
    assert_eq!(
        response,
        OrderSoupIntentResponse::Success {
            soup: intent.soup.clone().unwrap(),
            wait_time_minutes: DEFAULT_WAIT_TIME_MINUTES,
        }
    );
    assert_eq!(orders.order_history(), vec![order]);

    let mut no_quantity = intent;
    no_quantity.quantity = None;
    assert_eq!(handler.handle(&no_quantity), OrderSoupIntentResponse::Failure);
    assert_eq!(orders.len(), 1);
}

struct StaticShortcuts {
    shortcuts: Mutex<Result<Vec<VoiceShortcut>>>,
}

impl StaticShortcuts {
    fn set(&self, next: Result<Vec<VoiceShortcut>>) {
        *self.shortcuts.lock().unwrap() = next;
    }
}

#[async_trait]
impl VoiceShortcutSource for StaticShortcuts {
    async fn all_voice_shortcuts(&self) -> Result<Vec<VoiceShortcut>> {
        match &*self.shortcuts.lock().unwrap() {
            Ok(shortcuts) => Ok(shortcuts.clone()),
            Err(err) => Err(SoupError::Storage(err.to_string())),
        }
    }
}

#[tokio::test]
async fn test_voice_shortcut_lookup() {
    let store = MemoryStore::new();
    let (menu, _orders) = open_stores(&store).await;

    let usual = order_for(&menu, "Clam Chowder", 1, &[MenuItemOption::Croutons]);
    let shortcut = VoiceShortcut {
        identifier: Uuid::new_v4(),
        invocation_phrase: "My usual".to_string(),
        intent: usual.to_intent(),
    };
    let source = Arc::new(StaticShortcuts {
        shortcuts: Mutex::new(Ok(vec![shortcut.clone()])),
    });

    let index = VoiceShortcutIndex::open(shared(&store), CollectionConfig::new(), source.clone())
        .await
        .unwrap();
    assert_eq!(index.refresh().await, 1);

    let same_order = order_for(&menu, "Clam Chowder", 1, &[MenuItemOption::Croutons]);
    assert_eq!(
        index.voice_shortcut_for(&same_order, menu.as_ref()),
        Some(shortcut.clone())
    );

    let other_order = order_for(&menu, "Clam Chowder", 2, &[MenuItemOption::Croutons]);
    assert!(index.voice_shortcut_for(&other_order, menu.as_ref()).is_none());

    source.set(Err(SoupError::Storage("assistant unavailable".to_string())));
    assert_eq!(index.refresh().await, 1);
    assert_eq!(index.voice_shortcuts(), vec![shortcut]);

    index.flush().await.unwrap();
    assert!(store.contains_key("voiceShortcutHistory"));
}
