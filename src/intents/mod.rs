//! Voice intent schema and its mapping to and from [`Order`](crate::model::Order).

mod convert;
mod donation;
mod handler;
mod schema;
mod shortcuts;

pub use convert::SUGGESTED_INVOCATION_PHRASE_KEY;
pub use donation::{DonationCenter, NoopDonations};
pub(crate) use donation::spawn_best_effort;
pub use handler::{DEFAULT_WAIT_TIME_MINUTES, OrderSoupIntentHandler};
pub use schema::{IntentImage, IntentObject, OrderSoupIntent, OrderSoupIntentResponse};
pub use shortcuts::{VoiceShortcut, VoiceShortcutIndex, VoiceShortcutSource};
