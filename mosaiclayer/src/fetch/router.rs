//! Scheme-based fetcher dispatch.

use super::file::FileImageFetcher;
use super::http::HttpImageFetcher;
use super::types::{BoxFuture, ImageFetcher, LoadError};
use crate::bitmap::Bitmap;

/// Routes `http(s)://` URLs to [`HttpImageFetcher`] and `file://` URLs to
/// [`FileImageFetcher`]. Anything else is [`LoadError::UnsupportedScheme`].
pub struct SchemeRouter {
    http: HttpImageFetcher,
    file: FileImageFetcher,
}

impl SchemeRouter {
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self {
            http: HttpImageFetcher::new()?,
            file: FileImageFetcher::new(),
        })
    }
}

impl ImageFetcher for SchemeRouter {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<Bitmap, LoadError>> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme.to_lowercase());
        match scheme.as_deref() {
            Some("http") | Some("https") => self.http.fetch(url),
            Some("file") => self.file.fetch(url),
            _ => {
                let url = url.to_string();
                Box::pin(async move { Err(LoadError::UnsupportedScheme(url)) })
            }
        }
    }
}
