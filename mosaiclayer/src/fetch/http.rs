//! HTTP image fetcher using reqwest.

use std::time::Duration;

use tracing::debug;

use super::types::{decode_image, BoxFuture, ImageFetcher, LoadError};
use crate::bitmap::Bitmap;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Fetches `http://` and `https://` images.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the default timeout.
    pub fn new() -> Result<Self, LoadError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a fetcher with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LoadError::Http {
                url: String::new(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Http {
                url: url.to_string(),
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Http {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| LoadError::Http {
                url: url.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<Bitmap, LoadError>> {
        let url = url.to_string();
        Box::pin(async move {
            let bytes = self.fetch_bytes(&url).await?;
            debug!(url = %url, bytes = bytes.len(), "Fetched source image");
            decode_image(&url, bytes).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpImageFetcher::with_timeout(5).is_ok());
    }
}
