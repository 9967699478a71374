//! Rectangle types

use std::fmt;

use thiserror::Error;

/// Errors raised when constructing rectangles from raw bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RectangleError {
    /// One of the bounds is NaN or infinite.
    #[error("Rectangle bounds must be finite: west={west}, south={south}, east={east}, north={north}")]
    NonFinite {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },

    /// `west >= east` or `south >= north`.
    #[error("Rectangle is empty: west={west}, south={south}, east={east}, north={north}")]
    Empty {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
}

/// A geographic position in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn from_degrees(longitude: f64, latitude: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians())
    }
}

/// A non-empty longitude/latitude rectangle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicRectangle {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl GeographicRectangle {
    /// Creates a rectangle, rejecting empty or non-finite bounds.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, RectangleError> {
        if !(west.is_finite() && south.is_finite() && east.is_finite() && north.is_finite()) {
            return Err(RectangleError::NonFinite {
                west,
                south,
                east,
                north,
            });
        }
        if west >= east || south >= north {
            return Err(RectangleError::Empty {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Creates a rectangle from bounds given in degrees.
    pub fn from_degrees(
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    ) -> Result<Self, RectangleError> {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }

    #[inline]
    pub fn west(&self) -> f64 {
        self.west
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.east
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.north
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Axis-aligned overlap test.
    ///
    /// Touching edges do not count as an overlap. No antimeridian handling.
    pub fn intersects(&self, other: &GeographicRectangle) -> bool {
        self.west < other.east
            && other.west < self.east
            && self.south < other.north
            && other.south < self.north
    }

    /// Overlapping region of two rectangles, or `None` if they do not overlap.
    pub fn intersection(&self, other: &GeographicRectangle) -> Option<GeographicRectangle> {
        GeographicRectangle::new(
            self.west.max(other.west),
            self.south.max(other.south),
            self.east.min(other.east),
            self.north.min(other.north),
        )
        .ok()
    }

    /// Componentwise min/max of both rectangles.
    pub fn union(&self, other: &GeographicRectangle) -> GeographicRectangle {
        GeographicRectangle {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Returns true when `other` lies entirely inside this rectangle.
    pub fn contains_rectangle(&self, other: &GeographicRectangle) -> bool {
        other.west >= self.west
            && other.east <= self.east
            && other.south >= self.south
            && other.north <= self.north
    }

    pub fn contains(&self, position: Cartographic) -> bool {
        position.longitude >= self.west
            && position.longitude <= self.east
            && position.latitude >= self.south
            && position.latitude <= self.north
    }

    /// Bounds in degrees as `(west, south, east, north)`.
    pub fn to_degrees(&self) -> (f64, f64, f64, f64) {
        (
            self.west.to_degrees(),
            self.south.to_degrees(),
            self.east.to_degrees(),
            self.north.to_degrees(),
        )
    }
}

impl fmt::Display for GeographicRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (west, south, east, north) = self.to_degrees();
        write!(
            f,
            "[W {:.6}°, S {:.6}°, E {:.6}°, N {:.6}°]",
            west, south, east, north
        )
    }
}

/// Bounds of an image in its own projected coordinate space.
///
/// Units are whatever the image's projection produces (usually metres).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedRectangle {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ProjectedRectangle {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Finite and non-empty.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Half-open containment: the max edges belong to the neighbouring image.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}
