//! Vector helpers for turtle frames.
//!
//! Rotations are right-handed about an arbitrary axis. Spherical accessors
//! use `phi` as the azimuth in the XY plane and `theta` as the polar angle
//! from +Z.

use crate::core::types::{DQuat, DVec3};

/// The vertical direction
pub const VERTICAL: DVec3 = DVec3::Z;

/// A vector perpendicular to `v`, built from its two largest components.
///
/// For +Z this is -X, which seeds every default turtle's left vector.
pub fn orthogonal(v: DVec3) -> DVec3 {
    let (x, y, z) = (v.x.abs(), v.y.abs(), v.z.abs());
    if x < y {
        if x < z { DVec3::new(0.0, v.z, -v.y) } else { DVec3::new(v.y, -v.x, 0.0) }
    } else if y < z {
        DVec3::new(-v.z, 0.0, v.x)
    } else {
        DVec3::new(v.y, -v.x, 0.0)
    }
}

/// Rotate `v` by `angle` radians about `axis`; a zero axis leaves `v` unchanged.
pub fn rotate_about(v: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    if angle == 0.0 {
        return v;
    }
    match axis.try_normalize() {
        Some(axis) => DQuat::from_axis_angle(axis, angle) * v,
        None => v,
    }
}

/// Angle in radians between two vectors, zero when either is zero.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos()
}

/// Azimuth of `v` in the XY plane.
pub fn phi(v: DVec3) -> f64 {
    if v.x == 0.0 && v.y == 0.0 { 0.0 } else { v.y.atan2(v.x) }
}

/// Polar angle of `v` measured from +Z.
pub fn theta(v: DVec3) -> f64 {
    let perp = (v.x * v.x + v.y * v.y).sqrt();
    if perp == 0.0 && v.z == 0.0 { 0.0 } else { perp.atan2(v.z) }
}

/// `v` with its azimuth replaced, keeping magnitude and polar angle.
pub fn with_phi(v: DVec3, phi: f64) -> DVec3 {
    let perp = (v.x * v.x + v.y * v.y).sqrt();
    DVec3::new(perp * phi.cos(), perp * phi.sin(), v.z)
}

/// Rescale `v` to `magnitude`; a zero vector stays zero.
pub fn with_magnitude(v: DVec3, magnitude: f64) -> DVec3 {
    let length = v.length();
    if length == 0.0 { v } else { v * (magnitude / length) }
}

/// Two unit vectors completing `axis` to a right-handed orthonormal frame.
pub fn frame_for(axis: DVec3) -> (DVec3, DVec3) {
    let w = axis.normalize_or_zero();
    let u = orthogonal(w).normalize_or_zero();
    let v = w.cross(u);
    (u, v)
}
