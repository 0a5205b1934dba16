use crate::core::BlobFormat;

/// Per-collection persistence configuration.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// Encoding of the persisted blob
    pub format: BlobFormat,

    /// Buffered "data changed" events per subscriber
    pub event_capacity: usize,
}

impl CollectionConfig {
    pub fn new() -> Self {
        Self {
            format: BlobFormat::MessagePack,
            event_capacity: 64,
        }
    }

    /// Set the blob encoding
    pub fn format(mut self, format: BlobFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the event channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
