//! Mosaic orchestration.
//!
//! [`MosaicOrchestrator`] owns the worker pool and two kinds of layer: a
//! full-coverage render of the whole mosaic made at startup, and an inset
//! re-rendered for whatever part of the mosaic is on screen.
//!
//! # Refresh cycle
//!
//! ```text
//! refresh(view) ──► estimator ──► None: nothing to do
//!                       │
//!                       ▼ rectangle
//!               token = iteration + 1
//!               spawn pool.request ─────────┐
//!                                           ▼
//! poll() ◄──── RefreshOutcome { token, rectangle, bitmap }
//!   │
//!   ├─ token != iteration ──► dropped
//!   └─ current ──► add inset, remove old inset, clear cutout
//!
//! post_render() × inset_wait_frames ──► cut inset out of full coverage
//! ```

mod config;
mod error;
mod layer;
mod orchestrator;

pub use config::{MosaicConfig, DEFAULT_INSET_WAIT_FRAMES, DEFAULT_RESOLUTION};
pub use error::MosaicError;
pub use layer::{Layer, LayerCollection, LayerId, LayerKind, LayerStack};
pub use orchestrator::MosaicOrchestrator;
