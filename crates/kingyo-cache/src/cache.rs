use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::CacheError;
use crate::event::CacheEvent;
use crate::key::{QueryFilter, QueryKey};

const EVENT_CAPACITY: usize = 256;

struct Entry {
    value: Value,
    stale: bool,
}

struct Inflight {
    key: QueryKey,
    invalidated: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    inflight: HashMap<u64, Inflight>,
    next_ticket: u64,
    epoch: u64,
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    id: u64,
    epoch: u64,
}

/// Shared query cache. Cheap to share behind an `Arc`; all state sits behind
/// one mutex, so every read and write is serialized.
pub struct QueryCache {
    inner: Mutex<Inner>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("QueryCache")
            .field("entries", &inner.entries.len())
            .field("in_flight", &inner.inflight.len())
            .field("epoch", &inner.epoch)
            .finish()
    }
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: CacheEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    /// Receive every subsequent change to the cache.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Cached value for `key`, stale or not.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Decode` if the stored value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, CacheError> {
        let value = self.lock().entries.get(key).map(|e| e.value.clone());
        value.map(|v| decode(key, v)).transpose()
    }

    /// Cached value for `key` only if it has not been invalidated.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Decode` if the stored value does not fit `T`.
    pub fn get_fresh<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<T>, CacheError> {
        let value = self
            .lock()
            .entries
            .get(key)
            .filter(|e| !e.stale)
            .map(|e| e.value.clone());
        value.map(|v| decode(key, v)).transpose()
    }

    /// `Some(true)` for a stale entry, `None` when there is no entry.
    #[must_use]
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.lock().entries.get(key).map(|e| e.stale)
    }

    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// All cached keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<_> = self.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().inflight.len()
    }

    /// Incremented by every [`Self::clear`].
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Store `value` under `key` as fresh data. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Encode` if `value` cannot be represented as JSON.
    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), CacheError> {
        let value = encode(key, value)?;
        self.lock().entries.insert(
            key.clone(),
            Entry {
                value,
                stale: false,
            },
        );
        self.emit(CacheEvent::Updated(key.clone()));
        Ok(())
    }

    /// Read-modify-write of one entry under the cache lock.
    ///
    /// `f` receives the current value (`None` when absent) and returns the new
    /// one; returning `None` leaves the entry untouched. `f` must not call back
    /// into the cache. Returns whether a value was written.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the current value does not decode as `T` or the
    /// new one cannot be encoded.
    pub fn update<T, F>(&self, key: &QueryKey, f: F) -> Result<bool, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> Option<T>,
    {
        {
            let mut inner = self.lock();
            let current = inner
                .entries
                .get(key)
                .map(|e| decode(key, e.value.clone()))
                .transpose()?;
            let Some(next) = f(current) else {
                return Ok(false);
            };
            let value = encode(key, &next)?;
            inner.entries.insert(
                key.clone(),
                Entry {
                    value,
                    stale: false,
                },
            );
        }
        self.emit(CacheEvent::Updated(key.clone()));
        Ok(true)
    }

    /// Mark every matching entry stale and flag matching in-flight fetches so
    /// their results land stale. Idempotent. Returns the number of entries
    /// marked.
    pub fn invalidate(&self, filter: &QueryFilter) -> usize {
        let (mut keys, poisoned) = {
            let mut inner = self.lock();
            let keys: Vec<QueryKey> = inner
                .entries
                .iter_mut()
                .filter(|(key, _)| filter.matches(key))
                .map(|(key, entry)| {
                    entry.stale = true;
                    key.clone()
                })
                .collect();
            let poisoned = poison_inflight(&mut inner, filter);
            (keys, poisoned)
        };
        keys.sort();
        tracing::debug!(?filter, entries = keys.len(), in_flight = poisoned, "cache invalidated");
        let count = keys.len();
        if count > 0 {
            self.emit(CacheEvent::Invalidated(keys));
        }
        count
    }

    /// Delete every matching entry. A fetch already running for a removed key
    /// may still store its result, marked stale. Returns the number removed.
    pub fn remove(&self, filter: &QueryFilter) -> usize {
        let (mut keys, poisoned) = {
            let mut inner = self.lock();
            let keys: Vec<QueryKey> = inner
                .entries
                .keys()
                .filter(|key| filter.matches(key))
                .cloned()
                .collect();
            for key in &keys {
                inner.entries.remove(key);
            }
            let poisoned = poison_inflight(&mut inner, filter);
            (keys, poisoned)
        };
        keys.sort();
        tracing::debug!(?filter, entries = keys.len(), in_flight = poisoned, "cache entries removed");
        let count = keys.len();
        if count > 0 {
            self.emit(CacheEvent::Removed(keys));
        }
        count
    }

    /// Drop everything and start a new epoch. Fetches begun earlier are
    /// discarded when they complete.
    pub fn clear(&self) {
        let epoch = {
            let mut inner = self.lock();
            inner.entries.clear();
            inner.inflight.clear();
            inner.epoch += 1;
            inner.epoch
        };
        tracing::debug!(epoch, "cache cleared");
        self.emit(CacheEvent::Cleared);
    }

    /// Return fresh cached data for `key`, or run `fetcher` and cache its
    /// result.
    ///
    /// The fetched value is always returned to the caller, even when a
    /// concurrent [`Self::clear`] means it is not stored. A failed fetch leaves
    /// any existing entry untouched.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error, or a `CacheError` converted into `E`.
    pub async fn fetch<T, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get_fresh::<T>(key)? {
            tracing::trace!(%key, "cache hit");
            return Ok(cached);
        }

        let guard = FetchGuard {
            cache: self,
            ticket: self.begin_fetch(key),
        };
        let value = fetcher().await?;
        self.complete_fetch(guard.ticket, key, &value)?;
        Ok(value)
    }

    fn begin_fetch(&self, key: &QueryKey) -> Ticket {
        let mut inner = self.lock();
        inner.next_ticket += 1;
        let ticket = Ticket {
            id: inner.next_ticket,
            epoch: inner.epoch,
        };
        inner.inflight.insert(
            ticket.id,
            Inflight {
                key: key.clone(),
                invalidated: false,
            },
        );
        ticket
    }

    fn complete_fetch<T: Serialize>(
        &self,
        ticket: Ticket,
        key: &QueryKey,
        value: &T,
    ) -> Result<(), CacheError> {
        let value = encode(key, value)?;
        {
            let mut inner = self.lock();
            let Some(flight) = inner.inflight.remove(&ticket.id) else {
                tracing::debug!(%key, "fetch finished after clear; discarded");
                return Ok(());
            };
            if ticket.epoch != inner.epoch {
                return Ok(());
            }
            inner.entries.insert(
                flight.key,
                Entry {
                    value,
                    stale: flight.invalidated,
                },
            );
        }
        self.emit(CacheEvent::Updated(key.clone()));
        Ok(())
    }
}

/// Removes the in-flight record when a fetch fails or its future is dropped.
struct FetchGuard<'a> {
    cache: &'a QueryCache,
    ticket: Ticket,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.cache.lock().inflight.remove(&self.ticket.id);
    }
}

fn poison_inflight(inner: &mut Inner, filter: &QueryFilter) -> usize {
    let mut count = 0;
    for flight in inner.inflight.values_mut() {
        if filter.matches(&flight.key) {
            flight.invalidated = true;
            count += 1;
        }
    }
    count
}

fn encode<T: Serialize>(key: &QueryKey, value: &T) -> Result<Value, CacheError> {
    serde_json::to_value(value).map_err(|source| CacheError::Encode {
        key: key.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(key: &QueryKey, value: Value) -> Result<T, CacheError> {
    serde_json::from_value(value).map_err(|source| {
        tracing::warn!(%key, %source, "cached value failed to decode");
        CacheError::Decode {
            key: key.to_string(),
            source,
        }
    })
}
