//! Mosaic error types

use thiserror::Error;

use crate::pool::PoolError;

/// Errors surfaced by the orchestrator.
#[derive(Debug, Clone, Error)]
pub enum MosaicError {
    #[error("Resolution must be at least 1x1, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The background refresh task panicked or was cancelled
    #[error("Refresh task failed: {0}")]
    RefreshTask(String),
}
