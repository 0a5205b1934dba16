// ============================================================================
// SoupChef Library
// ============================================================================

pub mod core;
pub mod storage;
pub mod persist;
pub mod model;
pub mod menu;
pub mod orders;
pub mod intents;

// Re-export main types for convenience
pub use core::{BlobFormat, Result, SoupError, StorageKey};
pub use storage::{CollectionConfig, FileStore, FileWatcher, KeyValueStore, MemoryStore, Subscription};
pub use persist::{ChangeOrigin, DataChanged, PersistedCollection};
pub use model::{MenuItem, MenuItemOption, Order, OrderType, Placemark};
pub use menu::{MenuLookup, MenuStore, SoupMenu, default_menu};
pub use orders::OrderStore;
pub use intents::{
    DonationCenter, IntentObject, NoopDonations, OrderSoupIntent, OrderSoupIntentHandler,
    OrderSoupIntentResponse, VoiceShortcut, VoiceShortcutIndex, VoiceShortcutSource,
};
