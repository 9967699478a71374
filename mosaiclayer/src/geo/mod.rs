//! Geographic and projected rectangles.
//!
//! All geographic values are in radians. A [`GeographicRectangle`] is always
//! non-empty (`west < east`, `south < north`); the empty case is modelled as
//! `None` by the operations that can produce it, never as a rectangle with
//! collapsed bounds.

mod bounds;
mod rectangle;

pub use bounds::BoundsAccumulator;
pub use rectangle::{Cartographic, GeographicRectangle, ProjectedRectangle, RectangleError};
