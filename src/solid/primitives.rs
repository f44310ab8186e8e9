//! Analytic solids: world sphere, ground slab and dome, branch frustums.

use std::f64::consts::{PI, TAU};

use rand::{Rng, RngCore};

use super::{Location, Solid, SURFACE_TOLERANCE};
use crate::core::types::DVec3;
use crate::math::Aabb;
use crate::math::vector::frame_for;

/// Classify from the clearances to each bounding surface (positive = inside).
fn classify(clearances: &[f64]) -> Location {
    let nearest = clearances.iter().copied().fold(f64::INFINITY, f64::min);
    if nearest > SURFACE_TOLERANCE {
        Location::Inside
    } else if nearest < -SURFACE_TOLERANCE {
        Location::Outside
    } else {
        Location::Surface
    }
}

fn clearance_out(clearances: &[f64]) -> f64 {
    clearances.iter().copied().fold(f64::INFINITY, f64::min).max(0.0)
}

fn clearance_in(clearances: &[f64]) -> f64 {
    clearances.iter().copied().fold(0.0, |acc, c| acc.max(-c))
}

/// Uniform point on a disk spanned by the unit vectors `u` and `v`.
fn disk_point(center: DVec3, u: DVec3, v: DVec3, radius: f64, rng: &mut dyn RngCore) -> DVec3 {
    let r = radius * rng.random::<f64>().sqrt();
    let angle = TAU * rng.random::<f64>();
    center + u * (r * angle.cos()) + v * (r * angle.sin())
}

/// Pick an index with probability proportional to `weights`.
fn pick_weighted(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = weights.iter().sum();
    let mut target = rng.random::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if target < *w {
            return i;
        }
        target -= w;
    }
    weights.len().saturating_sub(1)
}

/// Full sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orb {
    pub center: DVec3,
    pub radius: f64,
}

impl Orb {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    fn clearances(&self, p: DVec3) -> [f64; 1] {
        [self.radius - (p - self.center).length()]
    }
}

impl Solid for Orb {
    fn location(&self, p: DVec3) -> Location {
        classify(&self.clearances(p))
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        clearance_in(&self.clearances(p))
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        clearance_out(&self.clearances(p))
    }

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        let z = 2.0 * rng.random::<f64>() - 1.0;
        let angle = TAU * rng.random::<f64>();
        let r = (1.0 - z * z).max(0.0).sqrt();
        self.center + DVec3::new(r * angle.cos(), r * angle.sin(), z) * self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extent(self.center, DVec3::splat(self.radius))
    }

    fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }
}

/// Solid cylinder with a vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tube {
    pub center: DVec3,
    pub radius: f64,
    pub half_height: f64,
}

impl Tube {
    pub fn new(center: DVec3, radius: f64, half_height: f64) -> Self {
        Self { center, radius, half_height }
    }

    fn clearances(&self, p: DVec3) -> [f64; 2] {
        let d = p - self.center;
        [self.half_height - d.z.abs(), self.radius - d.truncate().length()]
    }
}

impl Solid for Tube {
    fn location(&self, p: DVec3) -> Location {
        classify(&self.clearances(p))
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        clearance_in(&self.clearances(p))
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        clearance_out(&self.clearances(p))
    }

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        let cap = PI * self.radius * self.radius;
        let side = TAU * self.radius * 2.0 * self.half_height;
        match pick_weighted(&[cap, cap, side], rng) {
            0 => disk_point(self.center - DVec3::Z * self.half_height, DVec3::X, DVec3::Y, self.radius, rng),
            1 => disk_point(self.center + DVec3::Z * self.half_height, DVec3::X, DVec3::Y, self.radius, rng),
            _ => {
                let angle = TAU * rng.random::<f64>();
                let z = (2.0 * rng.random::<f64>() - 1.0) * self.half_height;
                self.center + DVec3::new(self.radius * angle.cos(), self.radius * angle.sin(), z)
            }
        }
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extent(self.center, DVec3::new(self.radius, self.radius, self.half_height))
    }

    fn surface_area(&self) -> f64 {
        TAU * self.radius * (self.radius + 2.0 * self.half_height)
    }
}

/// Lower half of a sphere, flat face up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dome {
    pub center: DVec3,
    pub radius: f64,
}

impl Dome {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    fn clearances(&self, p: DVec3) -> [f64; 2] {
        let d = p - self.center;
        [self.radius - d.length(), -d.z]
    }
}

impl Solid for Dome {
    fn location(&self, p: DVec3) -> Location {
        classify(&self.clearances(p))
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        clearance_in(&self.clearances(p))
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        clearance_out(&self.clearances(p))
    }

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        let bowl = TAU * self.radius * self.radius;
        let lid = PI * self.radius * self.radius;
        if pick_weighted(&[bowl, lid], rng) == 1 {
            return disk_point(self.center, DVec3::X, DVec3::Y, self.radius, rng);
        }
        // Heights on a sphere zone are uniform
        let z = -rng.random::<f64>();
        let angle = TAU * rng.random::<f64>();
        let r = (1.0 - z * z).max(0.0).sqrt();
        self.center + DVec3::new(r * angle.cos(), r * angle.sin(), z) * self.radius
    }

    fn bounds(&self) -> Aabb {
        let r = self.radius;
        Aabb::new(self.center - DVec3::splat(r), self.center + DVec3::new(r, r, 0.0))
    }

    fn surface_area(&self) -> f64 {
        3.0 * PI * self.radius * self.radius
    }
}

/// Truncated cone between two circular faces.
///
/// `start_radius` applies at `center - axis * half_length`, `end_radius` at
/// the other end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub center: DVec3,
    pub axis: DVec3,
    pub half_length: f64,
    pub start_radius: f64,
    pub end_radius: f64,
}

impl Frustum {
    /// Frustum whose base disk is centered on `start` and which extends `length` along `direction`.
    pub fn along(start: DVec3, direction: DVec3, length: f64, start_radius: f64, end_radius: f64) -> Self {
        let axis = direction.normalize_or_zero();
        Self {
            center: start + axis * (length / 2.0),
            axis,
            half_length: length / 2.0,
            start_radius,
            end_radius,
        }
    }

    pub fn is_cylinder(&self) -> bool {
        self.start_radius == self.end_radius
    }

    /// Radius at axial offset `z` from the center.
    pub fn radius_at(&self, z: f64) -> f64 {
        if self.half_length <= 0.0 {
            return self.start_radius.max(self.end_radius);
        }
        let t = (z + self.half_length) / (2.0 * self.half_length);
        self.start_radius + (self.end_radius - self.start_radius) * t
    }

    fn slant(&self) -> f64 {
        let dr = self.start_radius - self.end_radius;
        (dr * dr + 4.0 * self.half_length * self.half_length).sqrt()
    }

    fn clearances(&self, p: DVec3) -> [f64; 2] {
        let d = p - self.center;
        let z = d.dot(self.axis);
        let radial = (d - self.axis * z).length();
        let slant = self.slant();
        // Perpendicular distance to the sloped side
        let cos = if slant > 0.0 { 2.0 * self.half_length / slant } else { 1.0 };
        [self.half_length - z.abs(), (self.radius_at(z) - radial) * cos]
    }
}

impl Solid for Frustum {
    fn location(&self, p: DVec3) -> Location {
        classify(&self.clearances(p))
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        clearance_in(&self.clearances(p))
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        clearance_out(&self.clearances(p))
    }

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        let (u, v) = frame_for(self.axis);
        let (r1, r2) = (self.start_radius, self.end_radius);
        let base = self.center - self.axis * self.half_length;
        let top = self.center + self.axis * self.half_length;
        let side = PI * (r1 + r2) * self.slant();

        match pick_weighted(&[PI * r1 * r1, PI * r2 * r2, side], rng) {
            0 => disk_point(base, u, v, r1, rng),
            1 => disk_point(top, u, v, r2, rng),
            _ => {
                // Axial density grows with the local radius
                let s = rng.random::<f64>();
                let t = if (r2 - r1).abs() < f64::EPSILON {
                    s
                } else {
                    let r = (r1 * r1 + s * (r2 * r2 - r1 * r1)).sqrt();
                    (r - r1) / (r2 - r1)
                };
                let z = (2.0 * t - 1.0) * self.half_length;
                let radius = self.radius_at(z);
                let angle = TAU * rng.random::<f64>();
                self.center + self.axis * z + (u * angle.cos() + v * angle.sin()) * radius
            }
        }
    }

    fn bounds(&self) -> Aabb {
        let radius = self.start_radius.max(self.end_radius);
        let base = self.center - self.axis * self.half_length;
        let top = self.center + self.axis * self.half_length;
        let mut aabb = Aabb::from_point(base);
        aabb.expand(top);
        Aabb::new(aabb.min - DVec3::splat(radius), aabb.max + DVec3::splat(radius))
    }

    fn surface_area(&self) -> f64 {
        let (r1, r2) = (self.start_radius, self.end_radius);
        PI * (r1 * r1 + r2 * r2 + (r1 + r2) * self.slant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_samples_on_surface(solid: &dyn Solid) {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let p = solid.point_on_surface(&mut rng);
            assert_eq!(solid.location(p), Location::Surface, "{p:?}");
        }
    }

    #[test]
    fn test_orb() {
        let orb = Orb::new(DVec3::ZERO, 2.0);
        assert_eq!(orb.location(DVec3::new(1.0, 0.0, 0.0)), Location::Inside);
        assert_eq!(orb.location(DVec3::new(3.0, 0.0, 0.0)), Location::Outside);
        assert!((orb.distance_to_in(DVec3::new(0.0, 3.5, 0.0)) - 1.5).abs() < 1e-12);
        assert!((orb.distance_to_out(DVec3::new(0.0, 0.5, 0.0)) - 1.5).abs() < 1e-12);
        assert_samples_on_surface(&orb);
    }

    #[test]
    fn test_tube() {
        let tube = Tube::new(DVec3::ZERO, 1.0, 0.1);
        assert_eq!(tube.location(DVec3::new(0.5, 0.5, 0.05)), Location::Inside);
        assert_eq!(tube.location(DVec3::new(0.5, 0.5, 0.2)), Location::Outside);
        assert!((tube.distance_to_out(DVec3::new(0.0, 0.0, 0.08)) - 0.02).abs() < 1e-12);
        assert_samples_on_surface(&tube);
    }

    #[test]
    fn test_dome_is_lower_half() {
        let dome = Dome::new(DVec3::ZERO, 1.0);
        assert_eq!(dome.location(DVec3::new(0.0, 0.0, -0.5)), Location::Inside);
        assert_eq!(dome.location(DVec3::new(0.0, 0.0, 0.5)), Location::Outside);
        assert_eq!(dome.bounds().max.z, 0.0);
        assert_samples_on_surface(&dome);
    }

    #[test]
    fn test_frustum_tapers() {
        let cone = Frustum::along(DVec3::ZERO, DVec3::Z, 2.0, 0.5, 0.1);
        assert_eq!(cone.center, DVec3::Z);
        assert_eq!(cone.location(DVec3::new(0.4, 0.0, 0.1)), Location::Inside);
        // Too wide for the narrow end
        assert_eq!(cone.location(DVec3::new(0.4, 0.0, 1.9)), Location::Outside);
        assert_eq!(cone.location(DVec3::new(0.0, 0.0, 2.5)), Location::Outside);
        assert!(!cone.is_cylinder());
        assert_samples_on_surface(&cone);
    }

    #[test]
    fn test_tilted_cylinder() {
        let direction = DVec3::new(1.0, 1.0, 0.0);
        let cylinder = Frustum::along(DVec3::ZERO, direction, 1.0, 0.2, 0.2);
        let mid = direction.normalize() * 0.5;
        assert_eq!(cylinder.location(mid), Location::Inside);
        assert!((cylinder.distance_to_out(mid) - 0.2).abs() < 1e-12);
        assert_eq!(cylinder.location(mid + DVec3::Z * 0.3), Location::Outside);
        assert!((cylinder.surface_area() - (2.0 * PI * 0.04 + 2.0 * PI * 0.2)).abs() < 1e-12);
        assert_samples_on_surface(&cylinder);
    }
}
