//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::{MapProjection, WGS84_SEMI_MAJOR_AXIS};
use crate::geo::Cartographic;

/// Latitude limit of Web Mercator, in radians (85.05112878°).
pub const MAX_MERCATOR_LATITUDE: f64 = 1.484_422_229_745_332_4;

#[derive(Debug, Clone, Copy)]
pub struct WebMercatorProjection {
    semi_major_axis: f64,
}

impl Default for WebMercatorProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl WebMercatorProjection {
    pub fn new() -> Self {
        Self {
            semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
        }
    }
}

impl MapProjection for WebMercatorProjection {
    fn name(&self) -> &str {
        "web_mercator"
    }

    fn project(&self, position: Cartographic) -> (f64, f64) {
        let latitude = position
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let x = position.longitude * self.semi_major_axis;
        let y = self.semi_major_axis * (FRAC_PI_4 + latitude * 0.5).tan().ln();
        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> Cartographic {
        let inverse = 1.0 / self.semi_major_axis;
        let longitude = x * inverse;
        let latitude = FRAC_PI_2 - 2.0 * (-y * inverse).exp().atan();
        Cartographic::new(longitude, latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_origin() {
        let projection = WebMercatorProjection::new();
        let (x, y) = projection.project(Cartographic::new(0.0, 0.0));
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_max_latitude_maps_to_half_circumference() {
        let projection = WebMercatorProjection::new();
        let (_, y) = projection.project(Cartographic::new(0.0, MAX_MERCATOR_LATITUDE));
        let half_circumference = std::f64::consts::PI * WGS84_SEMI_MAJOR_AXIS;
        assert!((y - half_circumference).abs() < 1.0, "y = {}", y);
    }

    #[test]
    fn test_roundtrip_mid_latitude() {
        let projection = WebMercatorProjection::new();
        let original = Cartographic::from_degrees(10.0, 53.55);
        let (x, y) = projection.project(original);
        let back = projection.unproject(x, y);
        assert!((back.longitude - original.longitude).abs() < 1e-10);
        assert!((back.latitude - original.latitude).abs() < 1e-10);
    }

    #[test]
    fn test_project_clamps_poles() {
        let projection = WebMercatorProjection::new();
        let (_, y) = projection.project(Cartographic::new(0.0, FRAC_PI_2));
        assert!(y.is_finite());
    }
}
