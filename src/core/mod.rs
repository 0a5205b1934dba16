pub mod error;
pub mod types;

pub use error::{Result, SoupError};
pub use types::{BlobFormat, StorageKey};
