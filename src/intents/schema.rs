use crate::model::{OrderType, Placemark};
use serde::{Deserialize, Serialize};

/// Identifier plus display string, as carried by the voice intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentObject {
    pub identifier: Option<String>,
    pub display: String,
}

impl IntentObject {
    pub fn new(identifier: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            display: display.into(),
        }
    }
}

/// Named image resource attached to an intent parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentImage {
    pub name: String,
}

/// The "order soup" voice intent.
///
/// Display strings hold localization keys; resolving them to user-facing
/// text is left to the voice assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSoupIntent {
    pub soup: Option<IntentObject>,
    pub quantity: Option<u32>,
    pub options: Option<Vec<IntentObject>>,
    #[serde(default)]
    pub order_type: OrderType,
    pub delivery_location: Option<Placemark>,
    pub store_location: Option<Placemark>,
    pub soup_image: Option<IntentImage>,
    pub suggested_invocation_phrase: Option<String>,
}

/// Outcome of confirming or handling an [`OrderSoupIntent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSoupIntentResponse {
    Ready,
    Success {
        soup: IntentObject,
        wait_time_minutes: u32,
    },
    Failure,
    FailureSoupUnavailable {
        soup: IntentObject,
    },
}
