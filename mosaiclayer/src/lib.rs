//! MosaicLayer - on-demand reprojection of image mosaics
//!
//! This library assembles a seamless map image from many independently
//! projected source images. Only the part of the mosaic that is on screen is
//! reprojected, at a resolution that grows as the viewer approaches, and the
//! render thread is never blocked while that happens.
//!
//! # Architecture
//!
//! ```text
//! MosaicOrchestrator ──► VisibilityEstimator ──► rectangle
//!        │
//!        ▼
//!   WorkerPool ──► ReprojectionWorker × N ──► ImageCache ──► ImageFetcher
//!        │                 (registry, target bitmap)
//!        ▼
//!   composite ──► Layer ──► LayerCollection
//! ```
//!
//! - [`worker`]: per-partition registry, cache and reprojection kernel
//! - [`pool`]: round-robin partitioning, fan-out/fan-in, compositing
//! - [`visibility`]: screen-sampling estimate of the visible region
//! - [`mosaic`]: refresh cycle, stale-result dropping, layer swapping
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mosaiclayer::config::MosaicFile;
//! use mosaiclayer::fetch::SchemeRouter;
//! use mosaiclayer::mosaic::{LayerStack, MosaicOrchestrator};
//! use mosaiclayer::visibility::{SceneMode, VisibilityEstimator};
//!
//! let file = MosaicFile::load()?;
//! let estimator = VisibilityEstimator::for_mode(SceneMode::Scene3D, projection);
//! let mut mosaic = MosaicOrchestrator::start(
//!     file.mosaic.clone(),
//!     file.sources()?,
//!     Arc::new(SchemeRouter::new()?),
//!     LayerStack::new(),
//!     estimator,
//!     &camera,
//! )
//! .await?;
//!
//! // Once per frame
//! mosaic.poll();
//! mosaic.post_render();
//! ```

pub mod bitmap;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod geo;
pub mod logging;
pub mod mosaic;
pub mod pool;
pub mod projection;
pub mod source;
pub mod visibility;
pub mod worker;

pub use bitmap::Bitmap;
pub use geo::{Cartographic, GeographicRectangle, ProjectedRectangle};
pub use mosaic::{MosaicConfig, MosaicError, MosaicOrchestrator};
pub use pool::{PoolConfig, PoolError, WorkerPool};
pub use source::SourceImage;
