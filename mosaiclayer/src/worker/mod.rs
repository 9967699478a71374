//! Reprojection workers.
//!
//! A [`ReprojectionWorker`] owns the subset of source images assigned to it
//! (its [`Registry`]), one [`ImageCache`](crate::cache::ImageCache), and a
//! target bitmap that the pool hands back after compositing. Given a
//! geographic rectangle and a pixel size it renders every overlapping image of
//! its registry into the target.
//!
//! ```text
//! request rectangle ──► candidates (AABB overlap, registry order)
//!                            │
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │ ImageCache          │──► miss ──► ImageFetcher
//!                 └──────────┬──────────┘
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │ reproject_into      │  per destination pixel:
//!                 │ (spawn_blocking +   │  lon/lat ──► project ──► sample
//!                 │  rayon rows)        │  overwrite target pixel
//!                 └──────────┬──────────┘
//!                            ▼
//!                      Reprojection { bitmap, stats }
//! ```

mod error;
mod kernel;
mod registry;
mod stats;
#[allow(clippy::module_inception)]
mod worker;

pub use error::{InitializationError, WorkerError};
pub use kernel::reproject_into;
pub use registry::{Registry, RegistryEntry};
pub use stats::ReprojectStats;
pub use worker::{Reprojection, ReprojectionWorker};
