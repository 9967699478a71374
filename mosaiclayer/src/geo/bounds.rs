//! Min/max accumulation of geographic positions.

use super::rectangle::{Cartographic, GeographicRectangle};

/// Accumulates longitude/latitude extrema.
///
/// Starts empty; [`finish`](Self::finish) yields `None` until at least two
/// distinct positions span a non-empty rectangle.
#[derive(Debug, Clone, Copy)]
pub struct BoundsAccumulator {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    samples: usize,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self {
            west: f64::INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            north: f64::NEG_INFINITY,
            samples: 0,
        }
    }

    /// Adds a position. Non-finite positions are ignored.
    pub fn add(&mut self, position: Cartographic) {
        if !position.longitude.is_finite() || !position.latitude.is_finite() {
            return;
        }
        self.west = self.west.min(position.longitude);
        self.east = self.east.max(position.longitude);
        self.south = self.south.min(position.latitude);
        self.north = self.north.max(position.latitude);
        self.samples += 1;
    }

    /// Widens the bounds to cover a whole rectangle.
    pub fn add_rectangle(&mut self, rectangle: &GeographicRectangle) {
        self.add(Cartographic::new(rectangle.west(), rectangle.south()));
        self.add(Cartographic::new(rectangle.east(), rectangle.north()));
    }

    /// Number of positions accepted so far.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub fn finish(&self) -> Option<GeographicRectangle> {
        if self.is_empty() {
            return None;
        }
        GeographicRectangle::new(self.west, self.south, self.east, self.north).ok()
    }

    /// Clamps the accumulated bounds to `limit` before building the rectangle.
    pub fn finish_clamped(&self, limit: &GeographicRectangle) -> Option<GeographicRectangle> {
        if self.is_empty() {
            return None;
        }
        GeographicRectangle::new(
            self.west.max(limit.west()),
            self.south.max(limit.south()),
            self.east.min(limit.east()),
            self.north.min(limit.north()),
        )
        .ok()
    }
}
