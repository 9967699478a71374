//! Bounded LRU of decoded bitmaps.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::{debug, trace};

use crate::bitmap::Bitmap;
use crate::fetch::{ImageFetcher, LoadError};

/// Default number of decoded images held per worker.
pub const DEFAULT_IMAGE_CACHE_SIZE: usize = 100;

/// Cache statistics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that required a fetch.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    /// Current number of entries.
    pub entries: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} entries, {} hits, {} misses, {} evictions",
            self.entries, self.capacity, self.hits, self.misses, self.evictions
        )
    }
}

/// LRU map from source URL to decoded bitmap, filled through an
/// [`ImageFetcher`] on miss.
pub struct ImageCache {
    entries: LruCache<String, Arc<Bitmap>>,
    fetcher: Arc<dyn ImageFetcher>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ImageCache {
    /// Creates a cache holding up to `capacity` bitmaps.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            fetcher,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Returns the bitmap for `url`, fetching and decoding it on a miss.
    ///
    /// A failed fetch leaves the cache unchanged.
    pub async fn get_or_load(&mut self, url: &str) -> Result<Arc<Bitmap>, LoadError> {
        if let Some(bitmap) = self.entries.get(url) {
            self.hits += 1;
            trace!(url = %url, "Image cache hit");
            return Ok(Arc::clone(bitmap));
        }

        self.misses += 1;
        debug!(url = %url, "Image cache miss, fetching");

        let bitmap = Arc::new(self.fetcher.fetch(url).await?);
        self.insert(url.to_string(), Arc::clone(&bitmap));
        Ok(bitmap)
    }

    fn insert(&mut self, url: String, bitmap: Arc<Bitmap>) {
        if let Some((evicted, _)) = self.entries.push(url.clone(), bitmap) {
            // `push` also returns the old value when replacing the same key
            if evicted != url {
                self.evictions += 1;
                debug!(url = %evicted, "Evicted least recently used image");
            }
        }
    }

    /// Presence check that does not change LRU order.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.entries.len(),
            capacity: self.capacity(),
        }
    }
}
