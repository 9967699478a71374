//! Source image descriptors.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::geo::ProjectedRectangle;
use crate::projection::MapProjection;

/// Errors describing a source image.
#[derive(Debug, Error)]
pub enum SourceError {
    /// URL is neither absolute nor resolvable as a filesystem path.
    #[error("Cannot make URL absolute: {0}")]
    InvalidUrl(String),

    /// Current directory needed to resolve a relative path is unavailable.
    #[error("Failed to resolve relative path {path}: {source}")]
    CurrentDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One independently projected image in the mosaic.
///
/// Immutable once built. Cloning is cheap: the projection is shared.
#[derive(Clone)]
pub struct SourceImage {
    url: String,
    projected_rectangle: ProjectedRectangle,
    projection: Arc<dyn MapProjection>,
}

impl SourceImage {
    /// Creates a source image, resolving `url` to an absolute URL.
    ///
    /// Strings with a scheme (`https://`, `file://`, ...) are kept as-is;
    /// anything else is treated as a filesystem path relative to the current
    /// directory and turned into a `file://` URL.
    pub fn new(
        url: impl AsRef<str>,
        projected_rectangle: ProjectedRectangle,
        projection: Arc<dyn MapProjection>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            url: absolute_url(url.as_ref())?,
            projected_rectangle,
            projection,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn projected_rectangle(&self) -> &ProjectedRectangle {
        &self.projected_rectangle
    }

    pub fn projection(&self) -> &Arc<dyn MapProjection> {
        &self.projection
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("url", &self.url)
            .field("projected_rectangle", &self.projected_rectangle)
            .field("projection", &self.projection.name())
            .finish()
    }
}

/// Resolves `raw` to an absolute URL string.
pub fn absolute_url(raw: &str) -> Result<String, SourceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SourceError::InvalidUrl(raw.to_string()));
    }

    // Single-letter schemes are Windows drive letters, not URLs
    if let Ok(url) = reqwest::Url::parse(raw) {
        if url.scheme().len() > 1 {
            return Ok(url.to_string());
        }
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| SourceError::CurrentDir {
                path: raw.to_string(),
                source,
            })?
            .join(path)
    };

    reqwest::Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|_| SourceError::InvalidUrl(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GeographicProjection;

    #[test]
    fn test_absolute_urls_are_kept() {
        assert_eq!(
            absolute_url("https://example.com/a.png").unwrap(),
            "https://example.com/a.png"
        );
        assert_eq!(absolute_url("mem://a").unwrap(), "mem://a");
    }

    #[test]
    fn test_relative_path_becomes_file_url() {
        let url = absolute_url("tiles/a.png").unwrap();
        assert!(url.starts_with("file://"), "{}", url);
        assert!(url.ends_with("/tiles/a.png"), "{}", url);
    }

    #[test]
    fn test_empty_url_is_rejected() {
        assert!(matches!(absolute_url("  "), Err(SourceError::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_shows_projection_name() {
        let image = SourceImage::new(
            "mem://a",
            ProjectedRectangle::new(0.0, 0.0, 1.0, 1.0),
            Arc::new(GeographicProjection::new()),
        )
        .unwrap();
        let text = format!("{:?}", image);
        assert!(text.contains("geographic"));
        assert!(text.contains("mem://a"));
    }
}
