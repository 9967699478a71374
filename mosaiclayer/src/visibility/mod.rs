//! View-dependent choice of the region to reproject.
//!
//! The renderer exposes its camera through [`ViewState`]; the surface the
//! scene is drawn on is a [`SurfaceIntersector`] chosen by [`SceneMode`].
//! [`VisibilityEstimator`] combines the two into the geographic rectangle an
//! inset layer should cover.

mod estimator;
mod surface;
mod view;

pub use estimator::{VisibilityEstimator, DEFAULT_GRID_SIZE, DEFAULT_MAX_VIEW_ANGLE_DEGREES};
pub use surface::{EllipsoidSurface, PlaneSurface, SceneMode, SurfaceHit, SurfaceIntersector};
pub use view::{PerspectiveView, Ray, ViewState};
