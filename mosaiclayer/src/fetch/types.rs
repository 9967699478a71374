//! Fetcher trait and error types

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::bitmap::Bitmap;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure to obtain pixels for one source image.
///
/// Non-fatal for a reprojection: the image simply contributes nothing.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Network or HTTP status failure.
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    /// Local file could not be read.
    #[error("I/O error for {url}: {message}")]
    Io { url: String, message: String },

    /// Bytes were fetched but could not be decoded.
    #[error("Failed to decode {url}: {message}")]
    Decode { url: String, message: String },

    /// No fetcher handles this URL scheme.
    #[error("Unsupported URL scheme in {0}")]
    UnsupportedScheme(String),

    /// The decode task panicked or was cancelled.
    #[error("Decode task failed for {url}: {message}")]
    Task { url: String, message: String },
}

impl LoadError {
    /// URL the error refers to.
    pub fn url(&self) -> &str {
        match self {
            LoadError::Http { url, .. }
            | LoadError::Io { url, .. }
            | LoadError::Decode { url, .. }
            | LoadError::Task { url, .. } => url,
            LoadError::UnsupportedScheme(url) => url,
        }
    }
}

/// Fetches and decodes a source image to RGBA8.
///
/// Implementations must be `Send + Sync`; one fetcher is shared by every
/// worker in a pool. Uses `Pin<Box<dyn Future>>` so it can be held as
/// `Arc<dyn ImageFetcher>`.
pub trait ImageFetcher: Send + Sync {
    /// Fetches `url` and decodes it.
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<Bitmap, LoadError>>;
}

/// Decodes encoded image bytes on the blocking pool.
pub async fn decode_image(url: &str, bytes: Vec<u8>) -> Result<Bitmap, LoadError> {
    let owned_url = url.to_string();
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes)
            .map(Bitmap::from_image)
            .map_err(|e| LoadError::Decode {
                url: owned_url,
                message: e.to_string(),
            })
    })
    .await
    .map_err(|e| LoadError::Task {
        url: url.to_string(),
        message: e.to_string(),
    })?
}
