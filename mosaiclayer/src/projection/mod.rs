//! Map projection abstraction.
//!
//! Each source image carries its own projection. The engine only needs the
//! forward/inverse pair; the concrete math is injected through
//! [`MapProjection`] so callers can plug in any projection library.
//!
//! Two common projections are provided:
//!
//! - [`GeographicProjection`]: equirectangular, scaled by the WGS84 radius
//! - [`WebMercatorProjection`]: EPSG:3857

mod extents;
mod geographic;
mod web_mercator;

pub use extents::{approximate_cartographic_extents, EXTENT_SAMPLES_PER_EDGE};
pub use geographic::GeographicProjection;
pub use web_mercator::WebMercatorProjection;

use std::fmt;

use crate::geo::Cartographic;

/// WGS84 semi-major axis in metres.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Forward/inverse projection between geographic and projected coordinates.
///
/// Implementations must be `Send + Sync`: a projection is shared by the worker
/// that owns the image and the rayon threads reprojecting it.
pub trait MapProjection: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and config files.
    fn name(&self) -> &str;

    /// Geographic (radians) to projected coordinates.
    fn project(&self, position: Cartographic) -> (f64, f64);

    /// Projected coordinates to geographic (radians).
    ///
    /// May return non-finite values outside the projection's valid domain.
    fn unproject(&self, x: f64, y: f64) -> Cartographic;
}

/// Looks up a built-in projection by its config name.
pub fn projection_by_name(name: &str) -> Option<std::sync::Arc<dyn MapProjection>> {
    match name.trim().to_lowercase().as_str() {
        "geographic" | "epsg:4326" => Some(std::sync::Arc::new(GeographicProjection::new())),
        "web_mercator" | "webmercator" | "epsg:3857" => {
            Some(std::sync::Arc::new(WebMercatorProjection::new()))
        }
        _ => None,
    }
}
