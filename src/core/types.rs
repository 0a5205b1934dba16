use super::{Result, SoupError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Named keys of the shared key-value suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    SoupMenu,
    OrderHistory,
    VoiceShortcutHistory,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::SoupMenu => "soupMenu",
            StorageKey::OrderHistory => "orderHistory",
            StorageKey::VoiceShortcutHistory => "voiceShortcutHistory",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.as_str().to_string()
    }
}

/// Serialized representation of a collection blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlobFormat {
    #[default]
    MessagePack,
    Json,
}

impl BlobFormat {
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            BlobFormat::MessagePack => {
                rmp_serde::to_vec_named(value).map_err(|e| SoupError::Encode(e.to_string()))
            }
            BlobFormat::Json => {
                serde_json::to_vec(value).map_err(|e| SoupError::Encode(e.to_string()))
            }
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            BlobFormat::MessagePack => {
                rmp_serde::from_slice(bytes).map_err(|e| SoupError::Decode(e.to_string()))
            }
            BlobFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| SoupError::Decode(e.to_string()))
            }
        }
    }
}

impl FromStr for BlobFormat {
    type Err = SoupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "msgpack" | "messagepack" => Ok(BlobFormat::MessagePack),
            "json" => Ok(BlobFormat::Json),
            other => Err(SoupError::Decode(format!("unknown blob format '{}'", other))),
        }
    }
}
