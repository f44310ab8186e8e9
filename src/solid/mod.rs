//! Closed solids answering point containment and distance queries.
//!
//! Every solid lives in world coordinates; placement is baked into the
//! shape rather than applied as a separate transform.

pub mod primitives;
pub mod tessellated;

use rand::RngCore;

use crate::core::types::DVec3;
use crate::math::Aabb;

pub use primitives::{Dome, Frustum, Orb, Tube};
pub use tessellated::TessellatedSolid;

/// Distance within which a point counts as on the surface (meters)
pub const SURFACE_TOLERANCE: f64 = 1e-9;

/// Where a point sits relative to a solid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Inside,
    Surface,
    Outside,
}

pub trait Solid {
    fn location(&self, p: DVec3) -> Location;

    /// Lower bound on the distance from an outside point to the solid; zero otherwise.
    fn distance_to_in(&self, p: DVec3) -> f64;

    /// Lower bound on the distance from an inside point to the surface; zero otherwise.
    fn distance_to_out(&self, p: DVec3) -> f64;

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3;

    fn bounds(&self) -> Aabb;

    fn surface_area(&self) -> f64;

    fn inside(&self, p: DVec3) -> bool {
        self.location(p) == Location::Inside
    }
}

/// Any solid the assembler can place
#[derive(Clone, Debug)]
pub enum Shape {
    Orb(Orb),
    Tube(Tube),
    Dome(Dome),
    Frustum(Frustum),
    Tessellated(TessellatedSolid),
}

impl Shape {
    fn solid(&self) -> &dyn Solid {
        match self {
            Shape::Orb(s) => s,
            Shape::Tube(s) => s,
            Shape::Dome(s) => s,
            Shape::Frustum(s) => s,
            Shape::Tessellated(s) => s,
        }
    }

    /// Short label used in volume names and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Orb(_) => "orb",
            Shape::Tube(_) => "tube",
            Shape::Dome(_) => "dome",
            Shape::Frustum(_) => "frustum",
            Shape::Tessellated(_) => "tessellated",
        }
    }
}

impl Solid for Shape {
    fn location(&self, p: DVec3) -> Location {
        self.solid().location(p)
    }

    fn distance_to_in(&self, p: DVec3) -> f64 {
        self.solid().distance_to_in(p)
    }

    fn distance_to_out(&self, p: DVec3) -> f64 {
        self.solid().distance_to_out(p)
    }

    fn point_on_surface(&self, rng: &mut dyn RngCore) -> DVec3 {
        self.solid().point_on_surface(rng)
    }

    fn bounds(&self) -> Aabb {
        self.solid().bounds()
    }

    fn surface_area(&self) -> f64 {
        self.solid().surface_area()
    }
}

impl From<TessellatedSolid> for Shape {
    fn from(solid: TessellatedSolid) -> Self {
        Shape::Tessellated(solid)
    }
}

impl From<Frustum> for Shape {
    fn from(solid: Frustum) -> Self {
        Shape::Frustum(solid)
    }
}

impl From<Orb> for Shape {
    fn from(solid: Orb) -> Self {
        Shape::Orb(solid)
    }
}

impl From<Tube> for Shape {
    fn from(solid: Tube) -> Self {
        Shape::Tube(solid)
    }
}

impl From<Dome> for Shape {
    fn from(solid: Dome) -> Self {
        Shape::Dome(solid)
    }
}
