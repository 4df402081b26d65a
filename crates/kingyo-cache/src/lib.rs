//! # kingyo-cache
//!
//! Process-wide query cache shared by every resource module.
//!
//! Entries are JSON values addressed by a [`QueryKey`]. Reads never trigger
//! network work on their own; [`QueryCache::fetch`] runs a caller-supplied
//! fetcher only when the entry is missing or stale. Invalidation marks entries
//! stale, removal deletes them, and [`QueryCache::clear`] starts a new epoch so
//! fetches begun before it cannot write into the new session.

mod cache;
mod error;
mod event;
mod key;

pub use cache::QueryCache;
pub use error::CacheError;
pub use event::CacheEvent;
pub use key::{KeyPart, QueryFilter, QueryKey};
