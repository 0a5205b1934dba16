/// Where a change to a collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Written by this collection instance.
    Local,
    /// Written by another writer sharing the store, picked up by a reload.
    External,
}

/// Broadcast to subscribers whenever the cached value of a collection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChanged {
    pub key: String,
    pub origin: ChangeOrigin,
}
