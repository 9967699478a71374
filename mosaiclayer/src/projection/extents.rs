//! Approximate geographic extents of a projected rectangle.

use super::MapProjection;
use crate::geo::{BoundsAccumulator, Cartographic, GeographicRectangle, ProjectedRectangle};

/// Number of samples taken along each edge of a projected rectangle.
pub const EXTENT_SAMPLES_PER_EDGE: usize = 32;

/// Approximates the geographic bounding rectangle of `rectangle`.
///
/// Samples points along all four edges (corners included), unprojects them,
/// and takes the extrema. Curved edges that bulge between samples can be
/// slightly underestimated. Returns `None` when no sample unprojects to a
/// finite position or the samples span no area.
pub fn approximate_cartographic_extents(
    rectangle: &ProjectedRectangle,
    projection: &dyn MapProjection,
) -> Option<GeographicRectangle> {
    let mut bounds = BoundsAccumulator::new();
    let steps = EXTENT_SAMPLES_PER_EDGE;
    let dx = rectangle.width() / steps as f64;
    let dy = rectangle.height() / steps as f64;

    for i in 0..=steps {
        let x = rectangle.min_x + dx * i as f64;
        let y = rectangle.min_y + dy * i as f64;

        // South and north edges
        bounds.add(unproject(projection, x, rectangle.min_y));
        bounds.add(unproject(projection, x, rectangle.max_y));
        // West and east edges
        bounds.add(unproject(projection, rectangle.min_x, y));
        bounds.add(unproject(projection, rectangle.max_x, y));
    }

    bounds.finish()
}

#[inline]
fn unproject(projection: &dyn MapProjection, x: f64, y: f64) -> Cartographic {
    projection.unproject(x, y)
}
