//! Worker pool: fan-out of requests, fan-in of partial bitmaps.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::cache::DEFAULT_IMAGE_CACHE_SIZE;
use crate::fetch::ImageFetcher;
use crate::geo::{BoundsAccumulator, GeographicRectangle};
use crate::source::SourceImage;
use crate::worker::{ReprojectStats, Reprojection, ReprojectionWorker, WorkerError};

use super::compositor::composite_reclaiming;
use super::error::PoolError;
use super::partition::partition_round_robin;

// =============================================================================
// Configuration
// =============================================================================

/// Default number of workers.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Capacity of each worker's command channel.
pub const WORKER_CHANNEL_CAPACITY: usize = 16;

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of workers (and image partitions).
    pub concurrency: usize,
    /// Decoded images held per worker.
    pub image_cache_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            image_cache_size: DEFAULT_IMAGE_CACHE_SIZE,
        }
    }
}

impl PoolConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_image_cache_size(mut self, image_cache_size: usize) -> Self {
        self.image_cache_size = image_cache_size;
        self
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.concurrency == 0 {
            return Err(PoolError::InvalidConcurrency(self.concurrency));
        }
        if self.image_cache_size == 0 {
            return Err(PoolError::InvalidCacheSize(self.image_cache_size));
        }
        Ok(())
    }
}

// =============================================================================
// Worker Tasks
// =============================================================================

/// Messages handled by a worker task.
enum WorkerCommand {
    Initialize {
        images: Vec<SourceImage>,
        reply: oneshot::Sender<Result<Option<GeographicRectangle>, WorkerError>>,
    },
    Reproject {
        rectangle: GeographicRectangle,
        width: u32,
        height: u32,
        reply: oneshot::Sender<Result<Reprojection, WorkerError>>,
    },
    /// A composited overlay handed back as the next target buffer.
    Recycle { bitmap: Bitmap },
}

/// Control-side handle of one worker task.
struct WorkerHandle {
    id: usize,
    commands: mpsc::Sender<WorkerCommand>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, WorkerError>>) -> WorkerCommand,
    ) -> Result<T, PoolError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| PoolError::WorkerUnavailable(self.id))?;
        response
            .await
            .map_err(|_| PoolError::WorkerUnavailable(self.id))?
            .map_err(|e| PoolError::from_worker(self.id, e))
    }
}

/// Runs a worker until shutdown or until every sender is dropped.
///
/// Commands are handled one at a time, so the worker's cache and target
/// bitmap are never shared.
async fn run_worker(
    mut worker: ReprojectionWorker,
    mut commands: mpsc::Receiver<WorkerCommand>,
    shutdown: CancellationToken,
) {
    let id = worker.id();
    debug!(worker = id, "Worker task starting");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            command = commands.recv() => match command {
                Some(WorkerCommand::Initialize { images, reply }) => {
                    let _ = reply.send(worker.initialize(images));
                }
                Some(WorkerCommand::Reproject { rectangle, width, height, reply }) => {
                    let result = worker.reproject(rectangle, width, height).await;
                    let _ = reply.send(result);
                }
                Some(WorkerCommand::Recycle { bitmap }) => worker.recycle(bitmap),
                None => break,
            }
        }
    }

    debug!(worker = id, "Worker task stopped");
}

// =============================================================================
// Worker Pool
// =============================================================================

/// A fixed set of reprojection workers over a partitioned image list.
///
/// `request` takes `&self` and may be called from many tasks at once; each
/// worker queues commands and handles them in arrival order.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    rectangle: GeographicRectangle,
    config: PoolConfig,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Partitions `sources` round-robin, spawns one task per worker and
    /// initializes them all concurrently.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Invalid sizing, any worker's initialization failure, or a mosaic with
    /// no images.
    pub async fn initialize_all(
        sources: Vec<SourceImage>,
        config: PoolConfig,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        let image_count = sources.len();
        let shutdown = CancellationToken::new();
        // Cancels the spawned workers if initialization bails out early
        let guard = shutdown.clone().drop_guard();

        let workers: Vec<WorkerHandle> = (0..config.concurrency)
            .map(|id| {
                let (commands, receiver) = mpsc::channel(WORKER_CHANNEL_CAPACITY);
                let worker =
                    ReprojectionWorker::new(id, config.image_cache_size, Arc::clone(&fetcher));
                let task = tokio::spawn(run_worker(worker, receiver, shutdown.child_token()));
                WorkerHandle { id, commands, task }
            })
            .collect();

        let partitions = partition_round_robin(sources, config.concurrency);
        let results = join_all(workers.iter().zip(partitions).map(|(handle, images)| {
            handle.call(move |reply| WorkerCommand::Initialize { images, reply })
        }))
        .await;

        let mut bounds = BoundsAccumulator::new();
        for result in results {
            if let Some(rectangle) = result? {
                bounds.add_rectangle(&rectangle);
            }
        }
        let rectangle = bounds.finish().ok_or(PoolError::EmptyMosaic)?;

        info!(
            workers = config.concurrency,
            images = image_count,
            rectangle = %rectangle,
            "Worker pool initialized"
        );

        Ok(Self {
            workers,
            rectangle,
            config,
            shutdown: guard.disarm(),
        })
    }

    /// Union of every worker's rectangle.
    pub fn rectangle(&self) -> GeographicRectangle {
        self.rectangle
    }

    pub fn concurrency(&self) -> usize {
        self.workers.len()
    }

    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Renders `rectangle` at `width`×`height` on every worker and composites
    /// the results in worker order.
    ///
    /// Waits for all workers; one slow worker delays the whole request.
    pub async fn request(
        &self,
        rectangle: GeographicRectangle,
        width: u32,
        height: u32,
    ) -> Result<Bitmap, PoolError> {
        self.request_with_stats(rectangle, width, height)
            .await
            .map(|(bitmap, _)| bitmap)
    }

    /// Like [`request`](Self::request), also returning each worker's stats.
    pub async fn request_with_stats(
        &self,
        rectangle: GeographicRectangle,
        width: u32,
        height: u32,
    ) -> Result<(Bitmap, Vec<ReprojectStats>), PoolError> {
        if width == 0 || height == 0 {
            return Err(PoolError::InvalidResolution { width, height });
        }

        let results = join_all(self.workers.iter().map(|handle| {
            handle.call(move |reply| WorkerCommand::Reproject {
                rectangle,
                width,
                height,
                reply,
            })
        }))
        .await;

        let mut bitmaps = Vec::with_capacity(results.len());
        let mut stats = Vec::with_capacity(results.len());
        for result in results {
            let reprojection = result?;
            bitmaps.push(reprojection.bitmap);
            stats.push(reprojection.stats);
        }

        let drawn: usize = stats.iter().map(|s| s.drawn).sum();
        debug!(rectangle = %rectangle, width, height, drawn, "Composited request");

        let (bitmap, overlays) =
            tokio::task::spawn_blocking(move || composite_reclaiming(bitmaps))
                .await
                .map_err(|e| PoolError::Composite(e.to_string()))?;

        // Worker 0's buffer became the result; the others go back for reuse.
        // A full queue just means that worker allocates next time.
        for (handle, bitmap) in self.workers.iter().skip(1).zip(overlays) {
            let _ = handle.commands.try_send(WorkerCommand::Recycle { bitmap });
        }

        Ok((bitmap, stats))
    }

    /// Stops every worker task and waits for them to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        let workers = std::mem::take(&mut self.workers);
        join_all(workers.into_iter().map(|handle| handle.task)).await;
        info!("Worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{MemoryFetcher, SolidSource};
    use crate::geo::ProjectedRectangle;
    use crate::projection::GeographicProjection;

    const A: [u8; 4] = [200, 0, 0, 255];
    const B: [u8; 4] = [0, 200, 0, 255];
    const C: [u8; 4] = [0, 0, 200, 255];

    fn image(url: &str, rect: ProjectedRectangle) -> SourceImage {
        SourceImage::new(url, rect, Arc::new(GeographicProjection::with_radius(1.0))).unwrap()
    }

    fn fetcher() -> Arc<MemoryFetcher> {
        let solid = |rgba| SolidSource {
            width: 4,
            height: 4,
            rgba,
        };
        MemoryFetcher::new()
            .with_solid("mem://a", solid(A))
            .with_solid("mem://b", solid(B))
            .with_solid("mem://c", solid(C))
            .into_arc()
    }

    fn config(concurrency: usize) -> PoolConfig {
        PoolConfig::default()
            .with_concurrency(concurrency)
            .with_image_cache_size(4)
    }

    #[test]
    fn test_config_validation() {
        assert!(PoolConfig::default().validate().is_ok());
        assert!(matches!(
            config(0).validate(),
            Err(PoolError::InvalidConcurrency(0))
        ));
        assert!(matches!(
            config(1).with_image_cache_size(0).validate(),
            Err(PoolError::InvalidCacheSize(0))
        ));
    }

    #[tokio::test]
    async fn test_two_image_scenario_single_worker() {
        // A covers the west half, B the east half of [0,2]x[0,1]
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
                image("mem://b", ProjectedRectangle::new(1.0, 0.0, 2.0, 1.0)),
            ],
            config(1),
            fetcher(),
        )
        .await
        .unwrap();

        let rect = pool.rectangle();
        assert!((rect.west() - 0.0).abs() < 1e-12);
        assert!((rect.east() - 2.0).abs() < 1e-12);

        let bitmap = pool.request(rect, 8, 4).await.unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(bitmap.pixel(x, y), A, "pixel ({x},{y})");
            }
            for x in 4..8 {
                assert_eq!(bitmap.pixel(x, y), B, "pixel ({x},{y})");
            }
        }

        // Outside both images
        let wider = GeographicRectangle::new(-2.0, 0.0, 2.0, 1.0).unwrap();
        let bitmap = pool.request(wider, 8, 1).await.unwrap();
        assert_eq!(bitmap.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(bitmap.pixel(3, 0), [0, 0, 0, 0]);
        assert_eq!(bitmap.pixel(4, 0), A);
        assert_eq!(bitmap.pixel(7, 0), B);
    }

    #[tokio::test]
    async fn test_higher_worker_index_wins_overlap() {
        // Image 0 goes to worker 0, image 1 to worker 1; both cover everything
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://b", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
            ],
            config(2),
            fetcher(),
        )
        .await
        .unwrap();

        let bitmap = pool.request(pool.rectangle(), 4, 4).await.unwrap();
        assert!(bitmap.pixels().chunks_exact(4).all(|p| p == A));
    }

    #[tokio::test]
    async fn test_lower_worker_persists_where_higher_is_transparent() {
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
                image("mem://b", ProjectedRectangle::new(0.5, 0.0, 1.0, 1.0)),
            ],
            config(2),
            fetcher(),
        )
        .await
        .unwrap();

        let bitmap = pool.request(pool.rectangle(), 4, 1).await.unwrap();
        assert_eq!(bitmap.pixel(0, 0), A);
        assert_eq!(bitmap.pixel(1, 0), A);
        assert_eq!(bitmap.pixel(2, 0), B);
        assert_eq!(bitmap.pixel(3, 0), B);
    }

    #[tokio::test]
    async fn test_request_is_deterministic() {
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 0.6, 1.0)),
                image("mem://b", ProjectedRectangle::new(0.3, 0.1, 1.0, 0.9)),
                image("mem://c", ProjectedRectangle::new(0.2, 0.4, 0.8, 0.6)),
            ],
            config(3),
            fetcher(),
        )
        .await
        .unwrap();

        let rect = pool.rectangle();
        let first = pool.request(rect, 32, 32).await.unwrap();
        for _ in 0..3 {
            let again = pool.request(rect, 32, 32).await.unwrap();
            assert_eq!(first.pixels(), again.pixels());
        }
    }

    #[tokio::test]
    async fn test_recycled_buffers_survive_size_changes() {
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 0.5, 1.0)),
                image("mem://b", ProjectedRectangle::new(0.5, 0.0, 1.0, 1.0)),
            ],
            config(2),
            fetcher(),
        )
        .await
        .unwrap();
        let rect = pool.rectangle();

        let large = pool.request(rect, 16, 8).await.unwrap();
        let small = pool.request(rect, 4, 2).await.unwrap();
        let large_again = pool.request(rect, 16, 8).await.unwrap();

        assert_eq!((small.width(), small.height()), (4, 2));
        assert_eq!(small.pixel(0, 0), A);
        assert_eq!(small.pixel(3, 1), B);
        assert_eq!(large.pixels(), large_again.pixels());
    }

    #[tokio::test]
    async fn test_request_with_stats_reports_every_worker() {
        let pool = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 0.5, 1.0)),
                image("mem://b", ProjectedRectangle::new(0.5, 0.0, 1.0, 1.0)),
                image("mem://missing", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
            ],
            config(3),
            fetcher(),
        )
        .await
        .unwrap();

        let (_, stats) = pool
            .request_with_stats(pool.rectangle(), 4, 4)
            .await
            .unwrap();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].drawn, 1);
        assert_eq!(stats[1].drawn, 1);
        assert_eq!(stats[2].load_failures, 1);
    }

    #[tokio::test]
    async fn test_initialization_failure_fails_pool() {
        let err = WorkerPool::initialize_all(
            vec![
                image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0)),
                image("mem://bad", ProjectedRectangle::new(1.0, 0.0, 0.0, 1.0)),
            ],
            config(2),
            fetcher(),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, PoolError::Initialization { worker: 1, .. }));
    }

    #[tokio::test]
    async fn test_empty_mosaic() {
        let err = WorkerPool::initialize_all(Vec::new(), config(2), fetcher())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PoolError::EmptyMosaic));
    }

    #[tokio::test]
    async fn test_zero_resolution_rejected() {
        let pool = WorkerPool::initialize_all(
            vec![image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0))],
            config(1),
            fetcher(),
        )
        .await
        .unwrap();
        let err = pool.request(pool.rectangle(), 0, 4).await.unwrap_err();
        assert!(matches!(
            err,
            PoolError::InvalidResolution {
                width: 0,
                height: 4
            }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_pool() {
        let pool = Arc::new(
            WorkerPool::initialize_all(
                vec![
                    image("mem://a", ProjectedRectangle::new(0.0, 0.0, 0.5, 1.0)),
                    image("mem://b", ProjectedRectangle::new(0.5, 0.0, 1.0, 1.0)),
                ],
                config(2),
                fetcher(),
            )
            .await
            .unwrap(),
        );

        let rect = pool.rectangle();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move { pool.request(rect, 8, 8).await })
            })
            .collect();

        let results: Vec<_> = join_all(handles).await;
        let first = results[0].as_ref().unwrap().as_ref().unwrap().clone();
        for result in &results {
            assert_eq!(result.as_ref().unwrap().as_ref().unwrap(), &first);
        }
    }

    #[tokio::test]
    async fn test_request_after_shutdown_fails() {
        let pool = WorkerPool::initialize_all(
            vec![image("mem://a", ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0))],
            config(1),
            fetcher(),
        )
        .await
        .unwrap();
        let rect = pool.rectangle();

        pool.shutdown.cancel();
        // Give the worker a chance to observe cancellation and drop its receiver
        for _ in 0..100 {
            if pool.workers[0].task.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }

        let err = pool.request(rect, 2, 2).await.unwrap_err();
        assert!(matches!(err, PoolError::WorkerUnavailable(0)));
    }
}
