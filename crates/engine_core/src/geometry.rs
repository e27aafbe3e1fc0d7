//! Rays, spheres and the intersection test used for pointer picking.

use glam::Vec3;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; the direction is normalized. Returns `None` for a zero or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        if !origin.is_finite() {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Result of a ray query against a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Nearest intersection in front of the ray origin.
    ///
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        if self.radius <= 0.0 {
            return None;
        }
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let near = -b - root;
        let far = -b + root;
        let distance = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return None;
        };

        let point = ray.point_at(distance);
        let normal = (point - self.center).normalize_or_zero();
        Some(RayHit { distance, point, normal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3, dir: Vec3) -> Ray {
        Ray::new(origin, dir).unwrap()
    }

    #[test]
    fn ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn head_on_hit_returns_near_surface() {
        let s = Sphere::new(Vec3::ZERO, 10.0);
        let hit = s.intersect(&ray(Vec3::new(0.0, 0.0, 50.0), Vec3::NEG_Z)).unwrap();
        assert!((hit.distance - 40.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn miss_beside_silhouette() {
        let s = Sphere::new(Vec3::ZERO, 10.0);
        assert!(s.intersect(&ray(Vec3::new(11.0, 0.0, 50.0), Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn sphere_behind_ray_is_not_hit() {
        let s = Sphere::new(Vec3::ZERO, 10.0);
        assert!(s.intersect(&ray(Vec3::new(0.0, 0.0, 50.0), Vec3::Z)).is_none());
    }

    #[test]
    fn origin_inside_reports_exit_point() {
        let s = Sphere::new(Vec3::ZERO, 10.0);
        let hit = s.intersect(&ray(Vec3::ZERO, Vec3::X)).unwrap();
        assert!((hit.point - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    }
}
