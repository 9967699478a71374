//! Mosaic description files.
//!
//! A mosaic is described by an INI file: one `[mosaic]` section with engine
//! settings and one `[image.<name>]` section per source image.
//!
//! ```ini
//! [mosaic]
//! concurrency = 4
//! image_cache_size = 100
//! width = 1024
//! height = 1024
//!
//! [image.north_sheet]
//! url = tiles/north.png
//! projection = geographic
//! west = -55660
//! south = 0
//! east = 55660
//! north = 55660
//! ```
//!
//! Image bounds are in the image's projected units.

mod file;
mod parser;

pub use file::{config_directory, config_file_path, ConfigFileError, ImageSettings, MosaicFile};
pub use parser::IMAGE_SECTION_PREFIX;
