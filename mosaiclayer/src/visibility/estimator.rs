//! Screen-sampling estimate of the visible mosaic region.

use std::sync::Arc;

use glam::{DMat4, DVec3};
use tracing::trace;

use crate::geo::{BoundsAccumulator, GeographicRectangle};
use crate::projection::MapProjection;

use super::surface::{SceneMode, SurfaceHit, SurfaceIntersector};
use super::view::ViewState;

/// Screen samples per axis.
pub const DEFAULT_GRID_SIZE: usize = 10;

/// Samples seen at a steeper angle than this from the surface normal are
/// treated as horizon and ignored.
pub const DEFAULT_MAX_VIEW_ANGLE_DEGREES: f64 = 80.0;

/// Estimates which part of the mosaic is on screen.
///
/// A `grid_size`×`grid_size` grid of drawing-buffer positions (corners
/// included) is cast onto the surface. Hits that are inside the clip volume
/// and not grazing are accumulated into a lon/lat rectangle.
#[derive(Debug)]
pub struct VisibilityEstimator {
    surface: Box<dyn SurfaceIntersector>,
    grid_size: usize,
    max_view_angle: f64,
    last_accepted: Option<GeographicRectangle>,
}

impl VisibilityEstimator {
    pub fn new(surface: Box<dyn SurfaceIntersector>) -> Self {
        Self {
            surface,
            grid_size: DEFAULT_GRID_SIZE,
            max_view_angle: DEFAULT_MAX_VIEW_ANGLE_DEGREES.to_radians(),
            last_accepted: None,
        }
    }

    /// Estimator using the default intersector for `mode`.
    pub fn for_mode(mode: SceneMode, projection: Arc<dyn MapProjection>) -> Self {
        Self::new(mode.intersector(projection))
    }

    /// Sets the samples per axis (at least 2).
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size.max(2);
        self
    }

    /// Sets the grazing-angle limit, in radians.
    pub fn with_max_view_angle(mut self, radians: f64) -> Self {
        self.max_view_angle = radians;
        self
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn max_view_angle(&self) -> f64 {
        self.max_view_angle
    }

    /// Rectangle most recently passed to [`record_accepted`](Self::record_accepted).
    pub fn last_accepted(&self) -> Option<GeographicRectangle> {
        self.last_accepted
    }

    /// Remembers a rectangle whose render was installed, so an identical
    /// estimate is skipped.
    pub fn record_accepted(&mut self, rectangle: GeographicRectangle) {
        self.last_accepted = Some(rectangle);
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    /// Accumulates every accepted sample, without clamping.
    pub fn sample(&self, view: &dyn ViewState) -> BoundsAccumulator {
        let mut bounds = BoundsAccumulator::new();
        let (width, height) = view.drawing_buffer_size();
        if width == 0 || height == 0 {
            return bounds;
        }

        let steps = (self.grid_size - 1) as f64;
        let x_interval = width as f64 / steps;
        let y_interval = height as f64 / steps;
        let view_projection = view.view_projection();
        let camera = view.position();

        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                let Some(ray) = view.pick_ray(col as f64 * x_interval, row as f64 * y_interval)
                else {
                    continue;
                };
                let Some(hit) = self.surface.intersect(&ray) else {
                    continue;
                };
                if is_visible(&hit, &view_projection, camera, self.max_view_angle) {
                    bounds.add(hit.cartographic);
                }
            }
        }

        bounds
    }

    /// The region of `mosaic` worth rendering for `view`.
    ///
    /// Returns `None` when nothing needs rendering: no sample landed, the
    /// visible region misses the mosaic, it covers the whole mosaic, or it is
    /// identical to the last accepted rectangle.
    pub fn estimate(
        &self,
        view: &dyn ViewState,
        mosaic: &GeographicRectangle,
    ) -> Option<GeographicRectangle> {
        let bounds = self.sample(view);
        if bounds.is_empty() {
            trace!("No visible samples");
            return None;
        }

        let Some(rectangle) = bounds.finish_clamped(mosaic) else {
            trace!("Visible region does not overlap the mosaic");
            return None;
        };

        if rectangle == *mosaic {
            trace!("Whole mosaic visible");
            return None;
        }

        if self.last_accepted == Some(rectangle) {
            trace!(rectangle = %rectangle, "Visible region unchanged");
            return None;
        }

        trace!(samples = bounds.samples(), rectangle = %rectangle, "Visible region estimated");
        Some(rectangle)
    }
}

/// True when `hit` is inside the clip volume and not seen edge-on.
fn is_visible(hit: &SurfaceHit, view_projection: &DMat4, camera: DVec3, max_angle: f64) -> bool {
    let clip = *view_projection * hit.point.extend(1.0);
    if clip.w.abs() < f64::EPSILON {
        return false;
    }
    let ndc = clip.truncate() / clip.w;
    let inside = (-1.0..=1.0).contains(&ndc.x)
        && (-1.0..=1.0).contains(&ndc.y)
        && (-1.0..=1.0).contains(&ndc.z);
    if !inside {
        return false;
    }

    let Some(to_camera) = (camera - hit.point).try_normalize() else {
        return false;
    };
    to_camera.dot(hit.normal).clamp(-1.0, 1.0).acos() < max_angle
}
