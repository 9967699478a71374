//! Local file image fetcher.

use std::path::PathBuf;

use tracing::debug;

use super::types::{decode_image, BoxFuture, ImageFetcher, LoadError};
use crate::bitmap::Bitmap;

/// Reads images from `file://` URLs or plain filesystem paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageFetcher;

impl FileImageFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a `file://` URL or a bare path to a filesystem path.
    pub fn path_for(url: &str) -> Result<PathBuf, LoadError> {
        if url.starts_with("file:") {
            let parsed = reqwest::Url::parse(url)
                .map_err(|_| LoadError::UnsupportedScheme(url.to_string()))?;
            return parsed
                .to_file_path()
                .map_err(|_| LoadError::UnsupportedScheme(url.to_string()));
        }
        Ok(PathBuf::from(url))
    }
}

impl ImageFetcher for FileImageFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<Bitmap, LoadError>> {
        let url = url.to_string();
        Box::pin(async move {
            let path = Self::path_for(&url)?;
            let bytes = tokio::fs::read(&path).await.map_err(|e| LoadError::Io {
                url: url.clone(),
                message: e.to_string(),
            })?;
            debug!(path = %path.display(), bytes = bytes.len(), "Read source image");
            decode_image(&url, bytes).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_png_from_file_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("red.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let url = reqwest::Url::from_file_path(&path).unwrap().to_string();
        let bitmap = FileImageFetcher::new().fetch(&url).await.unwrap();
        assert_eq!(bitmap.width(), 2);
        assert_eq!(bitmap.pixel(1, 1), [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.png");
        let err = FileImageFetcher::new()
            .fetch(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
