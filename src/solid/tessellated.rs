//! Closed triangle soup answering point queries.

use rand::{Rng, RngCore};

use super::{Location, Solid, SURFACE_TOLERANCE};
use crate::core::types::DVec3;
use crate::math::{Aabb, Ray, triangle};
use crate::mesh::Mesh;

/// Directions for inside parity tests, chosen to avoid axis-aligned edges.
const PROBE_DIRECTIONS: [DVec3; 3] = [
    DVec3::new(0.431_934_4, 0.259_160_6, 0.863_868_8),
    DVec3::new(-0.267_261_2, 0.534_522_5, 0.801_783_7),
    DVec3::new(0.872_871_6, -0.218_217_9, -0.436_435_8),
];

/// A boundary representation built from the valid triangles of a mesh.
#[derive(Clone, Debug, Default)]
pub struct TessellatedSolid {
    facets: Vec<[DVec3; 3]>,
    /// Running facet area, for area-weighted sampling
    cumulative_area: Vec<f64>,
    bounds: Aabb,
}

impl TessellatedSolid {
    /// Keep the non-degenerate triangles of `mesh`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::from_facets(mesh.triangles().collect())
    }

    pub fn from_facets(facets: Vec<[DVec3; 3]>) -> Self {
        let mut total = 0.0;
        let cumulative_area = facets
            .iter()
            .map(|[a, b, c]| {
                total += triangle::area(*a, *b, *c);
                total
            })
            .collect();
        let bounds = Aabb::from_points(facets.iter().flatten().copied()).unwrap_or_default();
        Self { facets, cumulative_area, bounds }
    }

    pub fn facets(&self) -> &[[DVec3; 3]] {
        &self.facets
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    fn nearest_facet_distance(&self, p: DVec3) -> f64 {
        self.facets
            .iter()
            .map(|[a, b, c]| triangle::distance(p, *a, *b, *c))
            .fold(f64::INFINITY, f64::min)
    }

    /// Odd crossing count along a probe ray.
    fn crosses_odd(&self, p: DVec3, direction: DVec3) -> bool {
        let ray = Ray::new(p, direction);
        let hits = self
            .facets
            .iter()
            .filter(|[a, b, c]| ray.intersects_triangle(*a, *b, *c).is_some())
            .count();
        hits % 2 == 1
    }
}

impl Solid for TessellatedSolid {
    fn location(&self, p: DVec3) -> Location {
        if self.facets.is_empty() || !self.bounds.contains_point(p, SURFACE_TOLERANCE) {
            return Location::Outside;
        }
        if self.nearest_facet_distance(p) <= SURFACE_TOLERANCE {
            return Location::Surface;
        }
        let votes = PROBE_DIRECTIONS.iter().filter(|d| self.crosses_odd(p, **d)).count();
        if votes >= 2 { Location::Inside } else { Location::Outside }
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        match self.location(p) {
            Location::Outside if !self.facets.is_empty() => self.nearest_facet_distance(p),
            _ => 0.0,
        }
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        match self.location(p) {
            Location::Inside => self.nearest_facet_distance(p),
            _ => 0.0,
        }
    }

    /// Area-weighted random point; the bounds center for an empty solid.
    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        let Some(total) = self.cumulative_area.last().copied() else {
            return self.bounds.center();
        };
        let target = rng.random::<f64>() * total;
        let index = self
            .cumulative_area
            .partition_point(|area| *area <= target)
            .min(self.facets.len() - 1);
        let [a, b, c] = self.facets[index];

        let s = rng.random::<f64>().sqrt();
        let t = rng.random::<f64>();
        a * (1.0 - s) + b * (s * (1.0 - t)) + c * (s * t)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn surface_area(&self) -> f64 {
        self.cumulative_area.last().copied().unwrap_or(0.0)
    }
}
