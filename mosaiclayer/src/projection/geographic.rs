//! Equirectangular projection.

use super::{MapProjection, WGS84_SEMI_MAJOR_AXIS};
use crate::geo::Cartographic;

/// Plate carrée: `x = lon * a`, `y = lat * a`.
#[derive(Debug, Clone, Copy)]
pub struct GeographicProjection {
    semi_major_axis: f64,
}

impl Default for GeographicProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl GeographicProjection {
    pub fn new() -> Self {
        Self::with_radius(WGS84_SEMI_MAJOR_AXIS)
    }

    /// Uses a custom scale. A radius of `1.0` makes projected units radians.
    pub fn with_radius(semi_major_axis: f64) -> Self {
        Self { semi_major_axis }
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }
}

impl MapProjection for GeographicProjection {
    fn name(&self) -> &str {
        "geographic"
    }

    fn project(&self, position: Cartographic) -> (f64, f64) {
        (
            position.longitude * self.semi_major_axis,
            position.latitude * self.semi_major_axis,
        )
    }

    fn unproject(&self, x: f64, y: f64) -> Cartographic {
        let inverse = 1.0 / self.semi_major_axis;
        Cartographic::new(x * inverse, y * inverse)
    }
}
