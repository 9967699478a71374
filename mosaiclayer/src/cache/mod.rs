//! Per-worker decoded image cache.
//!
//! Each reprojection worker owns exactly one [`ImageCache`]. Nothing is shared
//! between workers, so the cache needs no locking and its eviction order is
//! fully determined by the worker's own access sequence.
//!
//! # Eviction
//!
//! Strict least-recently-used by entry count. Both hits and inserts move an
//! entry to the most-recently-used position; inserting beyond capacity evicts
//! the least-recently-used entry.
//!
//! # In-flight loads
//!
//! Two loads of the same URL are not joined: a worker handles one reprojection
//! at a time and loads its candidates sequentially, so a second load of a URL
//! always observes the first one's cache entry.

mod image_cache;

pub use image_cache::{CacheStats, ImageCache, DEFAULT_IMAGE_CACHE_SIZE};
