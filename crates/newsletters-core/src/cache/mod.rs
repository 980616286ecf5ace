//! Snapshot cache for offline support.
//!
//! Keeps the last accepted snapshot and any fetched bodies so the views can
//! be shown when the document store is unreachable.

mod model;
mod repository;

pub use model::{CachedBody, CachedSnapshot};
pub use repository::SnapshotCache;
