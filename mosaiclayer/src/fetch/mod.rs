//! Source image fetch and decode.
//!
//! The engine treats "fetch bytes, decode to RGBA" as a single opaque async
//! operation behind [`ImageFetcher`]. Implementations provided here:
//!
//! - [`HttpImageFetcher`]: `http://` / `https://` via reqwest
//! - [`FileImageFetcher`]: `file://` URLs and plain paths via tokio fs
//! - [`SchemeRouter`]: dispatches to one of the above by URL scheme
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mosaiclayer::fetch::{ImageFetcher, SchemeRouter};
//!
//! let fetcher: Arc<dyn ImageFetcher> = Arc::new(SchemeRouter::new()?);
//! let bitmap = fetcher.fetch("https://example.com/sheet.png").await?;
//! ```

mod file;
mod http;
mod router;
mod types;

pub use file::FileImageFetcher;
pub use http::{HttpImageFetcher, DEFAULT_HTTP_TIMEOUT_SECS};
pub use router::SchemeRouter;
pub use types::{decode_image, BoxFuture, ImageFetcher, LoadError};

#[cfg(test)]
pub use types::tests::{MemoryFetcher, SolidSource};
