//! Refresh cycle and layer swapping.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bitmap::Bitmap;
use crate::fetch::ImageFetcher;
use crate::geo::GeographicRectangle;
use crate::pool::{PoolError, WorkerPool};
use crate::source::SourceImage;
use crate::visibility::{ViewState, VisibilityEstimator};

use super::config::MosaicConfig;
use super::error::MosaicError;
use super::layer::{Layer, LayerCollection, LayerId, LayerKind};

/// A finished refresh request travelling back to the control thread.
struct RefreshOutcome {
    token: u64,
    rectangle: GeographicRectangle,
    result: Result<Bitmap, MosaicError>,
}

#[derive(Debug, Clone, Copy)]
struct Inset {
    id: LayerId,
    rectangle: GeographicRectangle,
    frames_rendered: u32,
}

/// Drives a mosaic: one permanent full-coverage layer plus at most one
/// high-resolution inset for the current view.
///
/// All methods run on the control (render) thread. `refresh` hands work to
/// the tokio runtime and returns at once; finished renders are picked up by
/// `poll`. Only the render whose token is still current is installed, so a
/// slow request superseded by a newer one is silently dropped.
///
/// An orchestrator only exists once startup has finished; there is no
/// half-initialized state to guard against.
pub struct MosaicOrchestrator<L: LayerCollection> {
    config: MosaicConfig,
    pool: Arc<WorkerPool>,
    runtime: Handle,
    layers: L,
    estimator: VisibilityEstimator,
    full_coverage: LayerId,
    inset: Option<Inset>,
    iteration: Arc<AtomicU64>,
    pending: Option<u64>,
    outcome_tx: mpsc::UnboundedSender<RefreshOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<RefreshOutcome>,
    frozen: bool,
    show_debug_bounds: bool,
    requested: Option<GeographicRectangle>,
}

impl<L: LayerCollection> MosaicOrchestrator<L> {
    /// Initializes the workers, installs the full-coverage layer and issues
    /// the first refresh for `initial_view`.
    ///
    /// # Errors
    ///
    /// Invalid resolution, or any pool error (sizing, image initialization,
    /// empty mosaic, full-coverage render).
    pub async fn start(
        config: MosaicConfig,
        sources: Vec<SourceImage>,
        fetcher: Arc<dyn ImageFetcher>,
        mut layers: L,
        estimator: VisibilityEstimator,
        initial_view: &dyn ViewState,
    ) -> Result<Self, MosaicError> {
        if config.width == 0 || config.height == 0 {
            return Err(MosaicError::InvalidResolution {
                width: config.width,
                height: config.height,
            });
        }

        info!(
            images = sources.len(),
            concurrency = config.pool.concurrency,
            image_cache_size = config.pool.image_cache_size,
            "Starting mosaic"
        );

        let pool = WorkerPool::initialize_all(sources, config.pool, fetcher).await?;
        let rectangle = pool.rectangle();

        let (bitmap, stats) = pool
            .request_with_stats(rectangle, config.width, config.height)
            .await?;
        for worker_stats in &stats {
            debug!(%worker_stats, "Full-coverage render");
        }

        let full_coverage = layers.add(Layer {
            kind: LayerKind::FullCoverage,
            rectangle,
            bitmap: Arc::new(bitmap),
            credit: config.credit.clone(),
        });
        info!(layer = %full_coverage, rectangle = %rectangle, "Full-coverage layer installed");

        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let show_debug_bounds = config.show_debug_bounds;
        let mut orchestrator = Self {
            config,
            pool: Arc::new(pool),
            runtime: Handle::current(),
            layers,
            estimator,
            full_coverage,
            inset: None,
            iteration: Arc::new(AtomicU64::new(0)),
            pending: None,
            outcome_tx,
            outcome_rx,
            frozen: false,
            show_debug_bounds,
            requested: None,
        };

        orchestrator.refresh(initial_view);
        Ok(orchestrator)
    }

    /// Starts rendering the visible region of the mosaic, if it needs one.
    ///
    /// Returns the token of the issued request, or `None` when frozen or when
    /// the estimator finds nothing new to render.
    pub fn refresh(&mut self, view: &dyn ViewState) -> Option<u64> {
        if self.frozen {
            debug!("Mosaic frozen, skipping refresh");
            return None;
        }

        let rectangle = self.estimator.estimate(view, &self.pool.rectangle())?;
        let token = self.iteration.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending = Some(token);
        self.requested = Some(rectangle);
        debug!(token, rectangle = %rectangle, "Refreshing inset");

        let pool = Arc::clone(&self.pool);
        let iteration = Arc::clone(&self.iteration);
        let outcome_tx = self.outcome_tx.clone();
        let (width, height) = (self.config.width, self.config.height);

        self.runtime.spawn(async move {
            let request = async move { pool.request(rectangle, width, height).await };
            let result = settle(request).await;
            if iteration.load(Ordering::SeqCst) != token {
                debug!(token, "Discarding superseded refresh");
                return;
            }
            let _ = outcome_tx.send(RefreshOutcome {
                token,
                rectangle,
                result,
            });
        });

        Some(token)
    }

    /// Installs any finished, still-current refresh.
    ///
    /// Never blocks. Returns the rectangle of the inset installed by this
    /// call, if any.
    pub fn poll(&mut self) -> Option<GeographicRectangle> {
        let mut installed = None;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(Ok(rectangle)) = self.apply(outcome) {
                installed = Some(rectangle);
            }
        }
        installed
    }

    /// Waits for the current refresh to finish and installs it.
    ///
    /// Returns `Ok(None)` immediately when no refresh is outstanding. A
    /// refresh whose task panicked ends the wait with
    /// [`MosaicError::RefreshTask`].
    pub async fn wait_for_refresh(&mut self) -> Result<Option<GeographicRectangle>, MosaicError> {
        while self.pending.is_some() {
            let Some(outcome) = self.outcome_rx.recv().await else {
                break;
            };
            match self.apply(outcome) {
                Some(Ok(rectangle)) => return Ok(Some(rectangle)),
                Some(Err(e)) => return Err(e),
                None => continue,
            }
        }
        Ok(None)
    }

    /// Call once after every rendered frame.
    ///
    /// The full-coverage layer keeps drawing under a new inset for
    /// `inset_wait_frames` frames before the inset region is cut out of it,
    /// which hides the inset's first frames of texture upload.
    pub fn post_render(&mut self) {
        let wait = self.config.inset_wait_frames;
        let Some(inset) = self.inset.as_mut() else {
            return;
        };
        if inset.frames_rendered < wait {
            inset.frames_rendered += 1;
            if inset.frames_rendered == wait {
                self.layers
                    .set_cutout(self.full_coverage, Some(inset.rectangle));
            }
        }
    }

    /// Stops or resumes refreshing.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Resumes refreshing and immediately refreshes for `view`.
    pub fn unfreeze(&mut self, view: &dyn ViewState) -> Option<u64> {
        self.frozen = false;
        self.refresh(view)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_show_debug_bounds(&mut self, show: bool) {
        self.show_debug_bounds = show;
    }

    /// The last requested rectangle, when debug bounds are enabled.
    pub fn debug_bounds(&self) -> Option<GeographicRectangle> {
        self.show_debug_bounds.then_some(self.requested).flatten()
    }

    /// Current iteration token.
    pub fn iteration(&self) -> u64 {
        self.iteration.load(Ordering::SeqCst)
    }

    /// True while the current refresh has not been installed or failed.
    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    /// Union rectangle of all source images.
    pub fn rectangle(&self) -> GeographicRectangle {
        self.pool.rectangle()
    }

    pub fn full_coverage_layer(&self) -> LayerId {
        self.full_coverage
    }

    pub fn inset_layer(&self) -> Option<LayerId> {
        self.inset.map(|inset| inset.id)
    }

    pub fn inset_rectangle(&self) -> Option<GeographicRectangle> {
        self.inset.map(|inset| inset.rectangle)
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }

    pub fn estimator(&self) -> &VisibilityEstimator {
        &self.estimator
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Applies one outcome. `None` when it was stale.
    fn apply(
        &mut self,
        outcome: RefreshOutcome,
    ) -> Option<Result<GeographicRectangle, MosaicError>> {
        let current = self.iteration.load(Ordering::SeqCst);
        if outcome.token != current {
            debug!(token = outcome.token, current, "Dropping stale refresh");
            return None;
        }
        self.pending = None;

        let bitmap = match outcome.result {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(token = outcome.token, error = %e, "Refresh failed");
                return Some(Err(e));
            }
        };

        let rectangle = outcome.rectangle;
        let id = self.layers.add(Layer {
            kind: LayerKind::Inset,
            rectangle,
            bitmap: Arc::new(bitmap),
            credit: self.config.credit.clone(),
        });
        if let Some(previous) = self.inset.take() {
            self.layers.remove(previous.id);
        }
        self.layers.set_cutout(self.full_coverage, None);

        self.inset = Some(Inset {
            id,
            rectangle,
            frames_rendered: 0,
        });
        if self.config.inset_wait_frames == 0 {
            self.layers.set_cutout(self.full_coverage, Some(rectangle));
        }
        self.estimator.record_accepted(rectangle);

        info!(token = outcome.token, layer = %id, rectangle = %rectangle, "Inset installed");
        Some(Ok(rectangle))
    }
}

/// Runs a refresh request in its own task so a panic still yields an
/// outcome; otherwise the current token would never be answered.
async fn settle<F>(request: F) -> Result<Bitmap, MosaicError>
where
    F: Future<Output = Result<Bitmap, PoolError>> + Send + 'static,
{
    match tokio::spawn(request).await {
        Ok(result) => result.map_err(MosaicError::from),
        Err(e) => Err(MosaicError::RefreshTask(e.to_string())),
    }
}
