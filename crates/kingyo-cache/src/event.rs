use crate::key::QueryKey;

/// Change notification broadcast by [`crate::QueryCache`].
///
/// Observers re-read the keys they care about; events carry no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A value was written (by `set`, `update` or a completed fetch).
    Updated(QueryKey),
    /// Entries were marked stale.
    Invalidated(Vec<QueryKey>),
    /// Entries were deleted.
    Removed(Vec<QueryKey>),
    /// Everything was dropped and a new epoch started.
    Cleared,
}

impl CacheEvent {
    /// Whether this event concerns `key`.
    #[must_use]
    pub fn touches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Updated(k) => k == key,
            Self::Invalidated(keys) | Self::Removed(keys) => keys.contains(key),
            Self::Cleared => true,
        }
    }
}
