//! Worker error types

use thiserror::Error;

use crate::geo::ProjectedRectangle;

/// A worker could not build its registry.
///
/// Fatal to mosaic startup.
#[derive(Debug, Clone, Error)]
pub enum InitializationError {
    /// Projected bounds are empty or not finite.
    #[error("Invalid projected rectangle for {url}: {rectangle:?}")]
    InvalidProjectedRectangle {
        url: String,
        rectangle: ProjectedRectangle,
    },

    /// No edge sample of the image unprojected to a usable position.
    #[error("Projection of {url} yields no finite geographic extent")]
    UnboundedExtent { url: String },
}

/// Errors from a single worker.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    /// `reproject` was called before `initialize`.
    #[error("Worker {worker} is not initialized")]
    NotInitialized { worker: usize },

    /// `initialize` was called twice.
    #[error("Worker {worker} is already initialized")]
    AlreadyInitialized { worker: usize },

    /// Registry construction failed.
    #[error("Worker {worker} failed to initialize: {source}")]
    Initialization {
        worker: usize,
        #[source]
        source: InitializationError,
    },

    /// The blocking reprojection task panicked.
    #[error("Worker {worker} reprojection task failed: {message}")]
    TaskFailed { worker: usize, message: String },
}
