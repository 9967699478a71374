//! Pool error types

use thiserror::Error;

use crate::worker::{InitializationError, WorkerError};

/// Errors from building or querying a [`WorkerPool`](super::WorkerPool).
#[derive(Debug, Clone, Error)]
pub enum PoolError {
    #[error("Concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("Image cache size must be at least 1, got {0}")]
    InvalidCacheSize(usize),

    #[error("Resolution must be at least 1x1, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    /// The worker task has stopped (pool shut down or task panicked).
    #[error("Worker {0} is not running")]
    WorkerUnavailable(usize),

    /// A worker could not build its registry.
    #[error("Worker {worker} failed to initialize: {source}")]
    Initialization {
        worker: usize,
        #[source]
        source: InitializationError,
    },

    /// A worker failed while handling a request.
    #[error("Worker {worker} failed: {source}")]
    Worker {
        worker: usize,
        #[source]
        source: WorkerError,
    },

    /// The compositing task panicked.
    #[error("Compositing failed: {0}")]
    Composite(String),

    /// No worker received an image with a usable extent.
    #[error("Mosaic has no source images")]
    EmptyMosaic,
}

impl PoolError {
    pub(crate) fn from_worker(worker: usize, error: WorkerError) -> Self {
        match error {
            WorkerError::Initialization { source, .. } => Self::Initialization { worker, source },
            other => Self::Worker {
                worker,
                source: other,
            },
        }
    }
}
