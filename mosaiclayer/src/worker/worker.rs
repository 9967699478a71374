//! The reprojection worker.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::bitmap::Bitmap;
use crate::cache::ImageCache;
use crate::fetch::ImageFetcher;
use crate::geo::GeographicRectangle;
use crate::source::SourceImage;

use super::error::WorkerError;
use super::kernel::reproject_into;
use super::registry::Registry;
use super::stats::ReprojectStats;

/// Result of one `reproject` call.
#[derive(Debug, Clone)]
pub struct Reprojection {
    pub bitmap: Bitmap,
    pub stats: ReprojectStats,
}

/// Renders the images of one registry into a target bitmap.
///
/// Handles one request at a time (`&mut self`), which is what makes the
/// unshared [`ImageCache`] safe without locks. The target is handed out with
/// each [`Reprojection`]; giving it back through [`recycle`](Self::recycle)
/// lets the next request of the same size reuse the buffer.
pub struct ReprojectionWorker {
    id: usize,
    registry: Option<Registry>,
    cache: ImageCache,
    target: Bitmap,
}

impl ReprojectionWorker {
    /// Creates an uninitialized worker.
    ///
    /// # Arguments
    ///
    /// * `id` - Partition index, used in logs and errors
    /// * `image_cache_size` - Maximum decoded images held
    /// * `fetcher` - Fetch + decode capability used on cache misses
    pub fn new(id: usize, image_cache_size: usize, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            id,
            registry: None,
            cache: ImageCache::new(image_cache_size, fetcher),
            target: Bitmap::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Keeps `bitmap` as the buffer for the next request.
    pub fn recycle(&mut self, bitmap: Bitmap) {
        self.target = bitmap;
    }

    /// Builds the registry and returns the union geographic rectangle of the
    /// assigned images (`None` when no images were assigned).
    ///
    /// Must be called exactly once, before any `reproject`.
    pub fn initialize(
        &mut self,
        images: Vec<SourceImage>,
    ) -> Result<Option<GeographicRectangle>, WorkerError> {
        if self.registry.is_some() {
            return Err(WorkerError::AlreadyInitialized { worker: self.id });
        }

        let registry = Registry::build(images).map_err(|source| WorkerError::Initialization {
            worker: self.id,
            source,
        })?;
        let rectangle = registry.rectangle();

        debug!(
            worker = self.id,
            images = registry.len(),
            rectangle = ?rectangle,
            "Worker initialized"
        );

        self.registry = Some(registry);
        Ok(rectangle)
    }

    /// Renders every candidate image overlapping `rectangle` into a
    /// `width`×`height` bitmap.
    ///
    /// Candidates are drawn in registry order; later images overwrite earlier
    /// ones. An image that fails to load is logged and skipped.
    pub async fn reproject(
        &mut self,
        rectangle: GeographicRectangle,
        width: u32,
        height: u32,
    ) -> Result<Reprojection, WorkerError> {
        let worker = self.id;
        let registry = self
            .registry
            .as_ref()
            .ok_or(WorkerError::NotInitialized { worker })?;
        let candidates: Vec<_> = registry.candidates(&rectangle).cloned().collect();

        let mut stats = ReprojectStats {
            worker,
            candidates: candidates.len(),
            ..Default::default()
        };

        let mut target = std::mem::take(&mut self.target);
        target.reset(width, height);

        for entry in candidates {
            let load_start = Instant::now();
            let loaded = self.cache.get_or_load(entry.source.url()).await;
            stats.load_time += load_start.elapsed();

            let source = match loaded {
                Ok(source) => source,
                Err(e) => {
                    warn!(worker, url = %entry.source.url(), error = %e, "Skipping image that failed to load");
                    stats.load_failures += 1;
                    continue;
                }
            };

            let reproject_start = Instant::now();
            let (returned, written) = tokio::task::spawn_blocking(move || {
                let written = reproject_into(&mut target, &rectangle, &source, &entry);
                (target, written)
            })
            .await
            .map_err(|e| WorkerError::TaskFailed {
                worker,
                message: e.to_string(),
            })?;
            target = returned;
            stats.reproject_time += reproject_start.elapsed();
            stats.pixels_written += written;
            stats.drawn += 1;
        }

        stats.cache = self.cache.stats();
        debug!(worker, %stats, "Reprojection complete");

        Ok(Reprojection {
            bitmap: target,
            stats,
        })
    }
}
