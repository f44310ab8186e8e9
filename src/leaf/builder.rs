//! Turning a leaf grammar into layered closed solids at a turtle pose.

use crate::core::Result;
use crate::core::types::DVec3;
use crate::lsystem::{Op, interpret};
use crate::math::{Aabb, triangle};
use crate::mesh::{extrapolate_surface, extrapolated_surface_area};
use crate::solid::TessellatedSolid;
use crate::species::{LeafSpecies, LeafSystem};
use crate::turtle::Turtle;

/// Triangles with two corners this close together are dropped
pub const SURFACE_FILTER_TOLERANCE: f64 = 1e-4;

/// Offsets of one leaf layer as multiples of the leaf thickness
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub front: f64,
    pub back: f64,
}

impl Layer {
    /// Glass cover above the cells
    pub const FRONT: Layer = Layer { front: 0.5, back: 0.03 };
    /// Photovoltaic cells
    pub const SENSITIVE: Layer = Layer { front: 0.03, back: 0.0 };
    /// Glass backing
    pub const BACK: Layer = Layer { front: 0.0, back: -0.5 };
    /// Air volume enclosing the other three
    pub const ENVELOPE: Layer = Layer { front: 0.5, back: -0.5 };
}

/// The layered solids of one placed leaf.
#[derive(Clone, Debug)]
pub struct LeafShells {
    pub front: TessellatedSolid,
    pub sensitive: TessellatedSolid,
    pub back: TessellatedSolid,
    pub envelope: TessellatedSolid,
    /// Front face plus skirt of the sensitive layer (m²)
    pub sensitive_area: f64,
}

/// Expands a leaf grammar once and replays it at any number of poses.
#[derive(Clone, Debug)]
pub struct LeafBuilder {
    species: LeafSpecies,
    program: Vec<Op>,
    thickness: f64,
}

impl LeafBuilder {
    pub fn new(system: &LeafSystem) -> Result<Self> {
        let expansion = system.expand()?;
        let thickness = system.parameters().double("thickness")?;
        log::debug!(
            "Expanded {} leaf: {} generations, {} instructions",
            system.species(),
            expansion.generations,
            expansion.program.len()
        );
        Ok(Self { species: system.species(), program: expansion.program, thickness })
    }

    pub fn species(&self) -> LeafSpecies {
        self.species
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn program(&self) -> &[Op] {
        &self.program
    }

    /// A leaf starts where the pose's segment ends, keeping its frame.
    pub fn start_turtle(pose: &Turtle) -> Turtle {
        Turtle::with_frame(pose.position + pose.length * pose.orientation, pose.orientation, pose.l_vector)
    }

    /// Triangles traced by the grammar at `pose`, without the problematic ones.
    pub fn surface(&self, pose: &Turtle) -> Result<Vec<Vec<DVec3>>> {
        let out = interpret(&self.program, Self::start_turtle(pose))?;
        let traced = out.polygons.len();
        let surface: Vec<Vec<DVec3>> = out
            .polygons
            .into_iter()
            .filter(|polygon| {
                matches!(polygon.as_slice(), &[a, b, c]
                    if !triangle::has_coincident_corners(a, b, c, SURFACE_FILTER_TOLERANCE))
            })
            .collect();
        if surface.len() < traced {
            log::debug!("Dropped {} of {} leaf polygons", traced - surface.len(), traced);
        }
        Ok(surface)
    }

    /// Area of the traced triangles before thickening.
    pub fn surface_area(&self, pose: &Turtle) -> Result<f64> {
        Ok(self
            .surface(pose)?
            .iter()
            .map(|t| triangle::area(t[0], t[1], t[2]))
            .sum())
    }

    fn layer(&self, surface: &[Vec<DVec3>], layer: Layer) -> Result<TessellatedSolid> {
        let mesh = extrapolate_surface(surface, layer.front * self.thickness, layer.back * self.thickness)?;
        Ok(TessellatedSolid::from_mesh(&mesh))
    }

    /// Outer air volume only.
    pub fn envelope(&self, pose: &Turtle) -> Result<TessellatedSolid> {
        self.layer(&self.surface(pose)?, Layer::ENVELOPE)
    }

    /// Bounding box of the envelope, `None` when the grammar traced nothing usable.
    pub fn envelope_extents(&self, pose: &Turtle) -> Result<Option<Aabb>> {
        let envelope = self.envelope(pose)?;
        Ok(Aabb::from_points(envelope.facets().iter().flatten().copied()))
    }

    /// All four layers and the sensitive area.
    pub fn shells(&self, pose: &Turtle) -> Result<LeafShells> {
        let surface = self.surface(pose)?;
        let sensitive = Layer::SENSITIVE;
        Ok(LeafShells {
            front: self.layer(&surface, Layer::FRONT)?,
            sensitive: self.layer(&surface, sensitive)?,
            back: self.layer(&surface, Layer::BACK)?,
            envelope: self.layer(&surface, Layer::ENVELOPE)?,
            sensitive_area: extrapolated_surface_area(
                &surface,
                sensitive.front * self.thickness,
                sensitive.back * self.thickness,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::Solid;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_planar_leaf_is_a_unit_square() {
        let builder = LeafBuilder::new(&LeafSystem::new(LeafSpecies::Planar)).unwrap();
        let pose = Turtle::default();
        let surface = builder.surface(&pose).unwrap();
        assert_eq!(surface.len(), 2);
        assert!((builder.surface_area(&pose).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(builder.thickness(), 0.01);
    }

    #[test]
    fn test_start_turtle_sits_at_segment_end() {
        let mut pose = Turtle::with_frame(DVec3::new(1.0, 2.0, 3.0), DVec3::Y, DVec3::X);
        pose.length = 0.5;
        pose.width = 0.3;
        let start = LeafBuilder::start_turtle(&pose);
        assert!(close(start.position, DVec3::new(1.0, 2.5, 3.0)));
        assert_eq!(start.orientation, DVec3::Y);
        assert_eq!(start.l_vector, DVec3::X);
        assert_eq!(start.length, 0.0);
        assert!(start.parent().is_none());
    }

    #[test]
    fn test_extents_follow_the_pose() {
        let builder = LeafBuilder::new(&LeafSystem::new(LeafSpecies::Cordate)).unwrap();
        let here = builder.envelope_extents(&Turtle::default()).unwrap().unwrap();
        let offset = DVec3::new(1.0, -2.0, 0.5);
        let mut moved = Turtle::default();
        moved.position = offset;
        let there = builder.envelope_extents(&moved).unwrap().unwrap();
        assert!(close(there.min - here.min, offset));
        assert!(close(there.max - here.max, offset));
    }

    #[test]
    fn test_layers_nest_inside_envelope() {
        let builder = LeafBuilder::new(&LeafSystem::new(LeafSpecies::Cordate)).unwrap();
        let shells = builder.shells(&Turtle::default()).unwrap();
        assert!(!shells.envelope.is_empty());
        assert!(shells.sensitive_area > 0.0);
        let envelope = shells.envelope.bounds();
        for layer in [&shells.front, &shells.sensitive, &shells.back] {
            let bounds = layer.bounds();
            assert!(envelope.contains_point(bounds.min, 1e-9));
            assert!(envelope.contains_point(bounds.max, 1e-9));
        }
    }
}
