//! Axis-aligned bounding box

use crate::core::types::DVec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box holding a single point
    pub fn from_point(point: DVec3) -> Self {
        Self { min: point, max: point }
    }

    /// Box centered on `center` reaching `half_extent` along each axis
    pub fn from_center_half_extent(center: DVec3, half_extent: DVec3) -> Self {
        Self { min: center - half_extent, max: center + half_extent }
    }

    /// Smallest box holding every point, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut aabb = Self::from_point(iter.next()?);
        for point in iter {
            aabb.expand(point);
        }
        Some(aabb)
    }

    /// Get center point
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Largest absolute coordinate reached along each axis
    pub fn max_abs(&self) -> DVec3 {
        self.min.abs().max(self.max.abs())
    }

    /// Check if point is inside AABB, grown by `margin` on every side
    pub fn contains_point(&self, p: DVec3, margin: f64) -> bool {
        p.x >= self.min.x - margin && p.x <= self.max.x + margin &&
        p.y >= self.min.y - margin && p.y <= self.max.y + margin &&
        p.z >= self.min.z - margin && p.z <= self.max.z + margin
    }

    /// Check if two AABBs intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged AABB containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
