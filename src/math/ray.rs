//! Ray type and operations

use crate::core::types::DVec3;
use super::aabb::Aabb;

/// Determinant magnitude below which a ray counts as parallel to a triangle
const PARALLEL_EPSILON: f64 = 1e-15;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: DVec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: DVec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f64, f64)> {
        let t1 = (aabb.min - self.origin) * self.inv_direction;
        let t2 = (aabb.max - self.origin) * self.inv_direction;

        let t_min = t1.min(t2);
        let t_max = t1.max(t2);

        let t_near = t_min.x.max(t_min.y).max(t_min.z);
        let t_far = t_max.x.min(t_max.y).min(t_max.z);

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Ray-triangle intersection (Moller-Trumbore).
    /// Returns the ray parameter of a hit in front of the origin.
    pub fn intersects_triangle(&self, a: DVec3, b: DVec3, c: DVec3) -> Option<f64> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(ray.at(5.0), DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_intersects_aabb_hit() {
        let ray = Ray::new(DVec3::new(-2.0, 0.5, 0.5), DVec3::X);
        let aabb = Aabb::new(DVec3::ZERO, DVec3::ONE);
        let hit = ray.intersects_aabb(&aabb);
        assert!(hit.is_some());
        let (t_near, t_far) = hit.unwrap();
        assert!((t_near - 2.0).abs() < 0.001);
        assert!((t_far - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_intersects_aabb_miss() {
        let ray = Ray::new(DVec3::new(-2.0, 5.0, 0.5), DVec3::X);
        let aabb = Aabb::new(DVec3::ZERO, DVec3::ONE);
        assert!(ray.intersects_aabb(&aabb).is_none());
    }

    #[test]
    fn test_intersects_triangle() {
        let ray = Ray::new(DVec3::new(0.2, 0.2, -1.0), DVec3::Z);
        let (a, b, c) = (DVec3::ZERO, DVec3::X, DVec3::Y);
        let t = ray.intersects_triangle(a, b, c).unwrap();
        assert!((t - 1.0).abs() < 1e-12);

        let behind = Ray::new(DVec3::new(0.2, 0.2, 1.0), DVec3::Z);
        assert!(behind.intersects_triangle(a, b, c).is_none());

        let outside = Ray::new(DVec3::new(0.8, 0.8, -1.0), DVec3::Z);
        assert!(outside.intersects_triangle(a, b, c).is_none());
    }
}
