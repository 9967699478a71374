//! Ray/surface intersection strategies.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;

use crate::geo::Cartographic;
use crate::projection::{MapProjection, WGS84_SEMI_MAJOR_AXIS};

use super::view::Ray;

/// Where a pick ray meets the rendered surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space intersection point.
    pub point: DVec3,
    /// Unit surface normal at `point`.
    pub normal: DVec3,
    /// Geographic position of `point`.
    pub cartographic: Cartographic,
}

/// Intersects pick rays with the surface the scene is drawn on.
pub trait SurfaceIntersector: Send + Sync + fmt::Debug {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;
}

/// How the scene is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    /// Globe rendering; positions lie on a sphere.
    #[default]
    Scene3D,
    /// Flattened map on the `x = 0` plane.
    ColumbusView,
}

impl SceneMode {
    /// Default intersector for this mode.
    ///
    /// Columbus view needs the map projection used to lay out the plane.
    pub fn intersector(self, projection: Arc<dyn MapProjection>) -> Box<dyn SurfaceIntersector> {
        match self {
            SceneMode::Scene3D => Box::new(EllipsoidSurface::wgs84()),
            SceneMode::ColumbusView => Box::new(PlaneSurface::new(projection)),
        }
    }
}

/// A sphere centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidSurface {
    radius: f64,
}

impl EllipsoidSurface {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn wgs84() -> Self {
        Self::new(WGS84_SEMI_MAJOR_AXIS)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn to_cartographic(point: DVec3) -> Cartographic {
        let longitude = point.y.atan2(point.x);
        let latitude = (point.z / point.length()).clamp(-1.0, 1.0).asin();
        Cartographic::new(longitude, latitude)
    }
}

impl SurfaceIntersector for EllipsoidSurface {
    /// Nearest intersection in front of the ray origin.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        // |o + t d|^2 = r^2 with |d| = 1
        let b = ray.origin.dot(ray.direction);
        let c = ray.origin.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        let t = if near >= 0.0 { near } else { far };
        if t < 0.0 {
            return None;
        }

        let point = ray.point_at(t);
        let normal = point.try_normalize()?;
        Some(SurfaceHit {
            point,
            normal,
            cartographic: Self::to_cartographic(point),
        })
    }
}

/// The Columbus-view plane `x = 0`.
///
/// World `(y, z)` on the plane are the projected `(x, y)` of the map
/// projection; the normal is `+X`.
#[derive(Debug, Clone)]
pub struct PlaneSurface {
    projection: Arc<dyn MapProjection>,
}

impl PlaneSurface {
    pub fn new(projection: Arc<dyn MapProjection>) -> Self {
        Self { projection }
    }
}

impl SurfaceIntersector for PlaneSurface {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        if ray.direction.x.abs() < f64::EPSILON {
            return None;
        }
        let t = -ray.origin.x / ray.direction.x;
        if t < 0.0 {
            return None;
        }

        let point = ray.point_at(t);
        let cartographic = self.projection.unproject(point.y, point.z);
        if !cartographic.longitude.is_finite() || !cartographic.latitude.is_finite() {
            return None;
        }

        Some(SurfaceHit {
            point,
            normal: DVec3::X,
            cartographic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GeographicProjection;

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = EllipsoidSurface::new(1.0);
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::NEG_X).unwrap();
        let hit = sphere.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::X).length() < 1e-12);
        assert!((hit.normal - DVec3::X).length() < 1e-12);
        assert!(hit.cartographic.longitude.abs() < 1e-12);
        assert!(hit.cartographic.latitude.abs() < 1e-12);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = EllipsoidSurface::new(1.0);
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::Y).unwrap();
        assert!(sphere.intersect(&ray).is_none());
        let away = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::X).unwrap();
        assert!(sphere.intersect(&away).is_none());
    }

    #[test]
    fn test_sphere_cartographic() {
        let sphere = EllipsoidSurface::new(2.0);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z).unwrap();
        let hit = sphere.intersect(&ray).unwrap();
        assert!((hit.cartographic.latitude - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let ray = Ray::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y).unwrap();
        let hit = sphere.intersect(&ray).unwrap();
        assert!((hit.cartographic.longitude - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_plane_hit_unprojects_yz() {
        let plane = PlaneSurface::new(Arc::new(GeographicProjection::with_radius(1.0)));
        let ray = Ray::new(DVec3::new(3.0, 0.2, -0.1), DVec3::NEG_X).unwrap();
        let hit = plane.intersect(&ray).unwrap();
        assert!(hit.point.x.abs() < 1e-12);
        assert_eq!(hit.normal, DVec3::X);
        assert!((hit.cartographic.longitude - 0.2).abs() < 1e-12);
        assert!((hit.cartographic.latitude + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_plane_parallel_or_behind() {
        let plane = PlaneSurface::new(Arc::new(GeographicProjection::with_radius(1.0)));
        let parallel = Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::Y).unwrap();
        assert!(plane.intersect(&parallel).is_none());
        let behind = Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::X).unwrap();
        assert!(plane.intersect(&behind).is_none());
    }
}
