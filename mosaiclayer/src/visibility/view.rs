//! Camera state consumed by the estimator.

use glam::{DMat4, DVec3, DVec4};

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit length.
    pub direction: DVec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`. `None` for a zero direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Read access to the renderer's camera.
pub trait ViewState {
    /// Camera position in world coordinates.
    fn position(&self) -> DVec3;

    /// Combined view-projection matrix (OpenGL clip conventions).
    fn view_projection(&self) -> DMat4;

    /// Drawing buffer size in pixels.
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Ray from the camera through a drawing-buffer pixel position.
    ///
    /// The origin is [`position`](Self::position); implementations aim it at
    /// the pixel's point on the far plane.
    fn pick_ray(&self, x: f64, y: f64) -> Option<Ray>;
}

/// A perspective camera described by its position and matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveView {
    position: DVec3,
    view_projection: DMat4,
    inverse_view_projection: DMat4,
    width: u32,
    height: u32,
}

impl PerspectiveView {
    pub fn new(position: DVec3, view_projection: DMat4, width: u32, height: u32) -> Self {
        Self {
            position,
            view_projection,
            inverse_view_projection: view_projection.inverse(),
            width,
            height,
        }
    }

    /// Builds a right-handed camera at `eye` looking at `target`.
    ///
    /// `fov_y` is the vertical field of view in radians; the aspect ratio
    /// comes from the buffer size.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        eye: DVec3,
        target: DVec3,
        up: DVec3,
        fov_y: f64,
        width: u32,
        height: u32,
        near: f64,
        far: f64,
    ) -> Self {
        let aspect = width.max(1) as f64 / height.max(1) as f64;
        let projection = DMat4::perspective_rh_gl(fov_y, aspect, near, far);
        let view = DMat4::look_at_rh(eye, target, up);
        Self::new(eye, projection * view, width, height)
    }

    fn unproject_ndc(&self, ndc: DVec4) -> Option<DVec3> {
        let world = self.inverse_view_projection * ndc;
        if world.w.abs() < f64::EPSILON {
            return None;
        }
        let point = world.truncate() / world.w;
        point.is_finite().then_some(point)
    }
}

impl ViewState for PerspectiveView {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn view_projection(&self) -> DMat4 {
        self.view_projection
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pick_ray(&self, x: f64, y: f64) -> Option<Ray> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        // Screen y grows downward, NDC y upward
        let ndc_x = 2.0 * x / self.width as f64 - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.height as f64;
        let far = self.unproject_ndc(DVec4::new(ndc_x, ndc_y, 1.0, 1.0))?;
        Ray::new(self.position, far - self.position)
    }
}
