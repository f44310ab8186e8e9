//! Building a plant structure from a tree grammar and a leaf grammar.

use std::f64::consts::FRAC_PI_2;

use super::config::AssemblyConfig;
use super::overlap::OverlapChecker;
use super::structure::{Structure, Volume};
use crate::core::Result;
use crate::core::types::DVec3;
use crate::leaf::{LeafBuilder, LeafShells};
use crate::lsystem::Interpretation;
use crate::math::Aabb;
use crate::math::vector::{phi, with_phi};
use crate::solid::{Dome, Frustum, Orb, Tube};
use crate::species::{LeafSystem, TreeSystem};
use crate::turtle::{Turtle, TurtleId};

/// Scale from the tree's reach to the world bounding radius
const WORLD_SCALE: f64 = 10.1;
/// Scale from a lone leaf's reach to the world bounding radius
const LEAF_WORLD_SCALE: f64 = 1.5;
/// The ground stops short of the world boundary by this factor
const GROUND_FRACTION: f64 = 0.95;
/// Floor slab half thickness as a fraction of the bounding radius, capped at `MAX_FLOOR_TOP`
const FLOOR_TOP_FRACTION: f64 = 0.001;
const MAX_FLOOR_TOP: f64 = 0.05;

/// A leaf waiting for its overlap check, with the branch volume it grows from.
#[derive(Clone, Debug)]
struct Candidate {
    pose: Turtle,
    branch: usize,
}

/// Builds placed geometry and metrics for tree and leaf grammars.
pub struct Assembler {
    config: AssemblyConfig,
}

impl Assembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Grow `tree`, place branches and the ground, then try every candidate leaf.
    ///
    /// The grammar is expanded and interpreted once; sizing and construction
    /// share the result.
    pub fn build(&self, tree: &TreeSystem, leaf: &LeafSystem) -> Result<Structure> {
        let grown = tree.grow()?;
        let leaves = LeafBuilder::new(leaf)?;
        let tree_iterations = tree.parameters().integer("iterationNumber")?;

        let extents = tree_extents(&grown, &leaves)?;
        let reach = extents.max_abs();
        let bounding_radius = (reach * WORLD_SCALE).length();
        let materials = &self.config.materials;

        let world = Volume::new("World", &materials.air, Orb::new(DVec3::ZERO, 3f64.sqrt() * bounding_radius));
        let mut structure = Structure::new(world);
        structure.metrics.x_size = reach.x;
        structure.metrics.y_size = reach.y;
        structure.metrics.z_size = reach.z;

        if self.config.include_ground {
            self.place_ground(&mut structure, bounding_radius);
        }

        let mut candidates = Vec::new();
        for root in grown.roots() {
            self.place_branch(&grown, root, tree_iterations, &mut structure, &mut candidates);
        }
        log::debug!(
            "Placed {} branch segments with {} candidate leaves",
            structure.metrics.branch_count,
            candidates.len()
        );

        let mut checker = OverlapChecker::new(&self.config);
        for candidate in candidates {
            let shells = leaves.shells(&candidate.pose)?;
            self.try_place_leaf(&mut structure, shells, Some(candidate.branch), &mut checker);
        }

        log::info!(
            "Assembled {} tree with {} leaves: {} leaves placed, {} rejected, sensitive area {:.4} m2",
            tree.species(),
            leaf.species(),
            structure.metrics.leaf_count,
            structure.metrics.rejected_leaf_count,
            structure.metrics.sensitive_area
        );
        Ok(structure)
    }

    /// A single leaf grown from the default turtle, in a world sized to fit it.
    pub fn build_leaf(&self, leaf: &LeafSystem) -> Result<Structure> {
        let leaves = LeafBuilder::new(leaf)?;
        let shells = leaves.shells(&Turtle::default())?;
        let reach = Aabb::from_points(shells.envelope.facets().iter().flatten().copied())
            .map(|extents| extents.max_abs())
            .unwrap_or(DVec3::ZERO);
        let bounding_radius = (reach * LEAF_WORLD_SCALE).length();

        let world = Volume::new("World", &self.config.materials.air, Orb::new(DVec3::ZERO, 3f64.sqrt() * bounding_radius));
        let mut structure = Structure::new(world);
        structure.metrics.x_size = reach.x;
        structure.metrics.y_size = reach.y;
        structure.metrics.z_size = reach.z;
        structure.metrics.sensitive_area = shells.sensitive_area;
        structure.metrics.leaf_count = 1;
        structure.add(self.leaf_volume(shells));
        log::info!("Assembled lone {} leaf, sensitive area {:.4} m2", leaf.species(), structure.metrics.sensitive_area);
        Ok(structure)
    }

    /// Overlap-check a leaf and commit it when it fits.
    ///
    /// Returns whether the leaf was placed. `branch` is the daughter index of
    /// the branch the leaf may touch.
    pub fn try_place_leaf(
        &self,
        structure: &mut Structure,
        shells: LeafShells,
        branch: Option<usize>,
        checker: &mut OverlapChecker,
    ) -> bool {
        if shells.envelope.is_empty() {
            log::warn!("Leaf traced no usable surface; skipping it");
            structure.metrics.rejected_leaf_count += 1;
            return false;
        }
        if checker.overlaps(&shells.envelope, &structure.world, branch) {
            log::warn!("Rejected overlapping leaf grown from branch {:?}", branch);
            structure.metrics.rejected_leaf_count += 1;
            return false;
        }
        structure.metrics.sensitive_area += shells.sensitive_area;
        structure.metrics.leaf_count += 1;
        structure.add(self.leaf_volume(shells));
        true
    }

    fn leaf_volume(&self, shells: LeafShells) -> Volume {
        let materials = &self.config.materials;
        Volume::new("LeafEnvelope", &materials.air, shells.envelope).with_children(vec![
            Volume::new("LeafFront", &materials.leaf_front, shells.front),
            Volume::new("LeafSensitive", &materials.leaf_sensitive, shells.sensitive),
            Volume::new("LeafBack", &materials.leaf_back, shells.back),
        ])
    }

    /// Floor slab at the origin with a dome underneath.
    fn place_ground(&self, structure: &mut Structure, bounding_radius: f64) {
        let top = (FLOOR_TOP_FRACTION * bounding_radius).min(MAX_FLOOR_TOP);
        let radius = 3f64.sqrt() * GROUND_FRACTION * bounding_radius;
        let floor = &self.config.materials.floor;
        structure.add(Volume::new("Floor", floor, Dome::new(DVec3::new(0.0, 0.0, -top), radius)));
        structure.add(Volume::new("FloorTop", floor, Tube::new(DVec3::ZERO, radius, top)));
    }

    /// Place the frustum of `id`, recurse into its children, then queue its leaves.
    fn place_branch(
        &self,
        grown: &Interpretation,
        id: TurtleId,
        tree_iterations: i64,
        structure: &mut Structure,
        candidates: &mut Vec<Candidate>,
    ) {
        let Some(turtle) = grown.turtle(id) else {
            return;
        };
        let start_radius = turtle.width / 2.0;
        let end_radius = match turtle.children().first().and_then(|child| grown.turtle(*child)) {
            Some(child) => child.width / 2.0,
            None if self.config.taper_terminal_branches => 0.0,
            None => start_radius,
        };
        let frustum = Frustum::along(turtle.position, turtle.orientation, turtle.length, start_radius, end_radius);
        let branch = structure.add(Volume::new("Trunk", &self.config.materials.trunk, frustum));
        structure.metrics.branch_count += 1;

        for child in turtle.children() {
            self.place_branch(grown, *child, tree_iterations, structure, candidates);
        }

        let mut queue = |pose: Turtle| candidates.push(Candidate { pose, branch });
        if turtle.is_terminal() {
            queue(turtle.detached());
            if tree_iterations != 0 {
                for pose in base_leaf_poses(turtle, 0.0) {
                    queue(pose);
                }
            }
        } else if start_radius < self.config.thin_branch_half_width {
            let inclination = if frustum.is_cylinder() {
                0.0
            } else {
                FRAC_PI_2 - (frustum.half_length / (start_radius - end_radius)).atan()
            };
            for pose in base_leaf_poses(turtle, inclination) {
                queue(pose);
            }
        }
    }
}

/// Two leaf poses on opposite sides of a branch base.
///
/// Heading and left vector turn by ∓90° of azimuth; a cone's `inclination`
/// tips the heading further and pulls the start in to the sloped surface.
fn base_leaf_poses(turtle: &Turtle, inclination: f64) -> [Turtle; 2] {
    [-1.0, 1.0].map(|side: f64| {
        let mut pose = turtle.detached();
        pose.orientation = with_phi(turtle.orientation, phi(turtle.orientation) + side * FRAC_PI_2 - inclination);
        pose.l_vector = with_phi(turtle.l_vector, phi(turtle.l_vector) + side * FRAC_PI_2);
        pose.length = turtle.width / 2.0 * inclination.cos();
        pose
    })
}

/// Bounds of every segment plus the leaf envelopes at childless turtles.
///
/// Leaves are measured from the turtle's own position with zero length.
pub fn tree_extents(grown: &Interpretation, leaves: &LeafBuilder) -> Result<Aabb> {
    let mut extents = match grown.retired.first().and_then(|id| grown.turtle(*id)) {
        Some(first) => Aabb::from_point(first.position),
        None => Aabb::from_point(DVec3::ZERO),
    };

    let mut pending: Vec<TurtleId> = grown.roots().collect();
    while let Some(id) = pending.pop() {
        let Some(turtle) = grown.turtle(id) else {
            continue;
        };
        extents.expand(turtle.position);
        extents.expand(turtle.end_point());
        pending.extend(turtle.children().iter().copied());

        if turtle.is_terminal() {
            let pose = Turtle::with_frame(turtle.position, turtle.orientation, turtle.l_vector);
            if let Some(envelope) = leaves.envelope_extents(&pose)? {
                extents = extents.merged(&envelope);
            }
        }
    }
    Ok(extents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{LeafSpecies, TreeSpecies};

    fn stump_and_square() -> (TreeSystem, LeafSystem) {
        (TreeSystem::new(TreeSpecies::Stump), LeafSystem::new(LeafSpecies::Planar))
    }

    #[test]
    fn test_every_candidate_is_counted_once() {
        let (tree, leaf) = stump_and_square();
        let structure = Assembler::new(AssemblyConfig::seeded(11)).build(&tree, &leaf).unwrap();
        let metrics = &structure.metrics;

        // tip of the upper segment plus two at the base of the lower one
        assert_eq!(metrics.candidate_leaf_count(), 3);
        assert_eq!(metrics.branch_count, 2);
        assert_eq!(structure.named("Trunk").count(), 2);
        assert_eq!(structure.named("LeafEnvelope").count(), metrics.leaf_count);
        assert!(metrics.sensitive_area >= 0.0);
    }

    #[test]
    fn test_world_encloses_scaled_extents() {
        let (tree, leaf) = stump_and_square();
        let structure = Assembler::new(AssemblyConfig::seeded(2)).build(&tree, &leaf).unwrap();

        let grown = tree.grow().unwrap();
        let extents = tree_extents(&grown, &LeafBuilder::new(&leaf).unwrap()).unwrap();
        let reach = extents.max_abs();
        let expected = 3f64.sqrt() * (reach * WORLD_SCALE).length();
        assert!((structure.metrics.world_radius - expected).abs() < 1e-9);
        assert_eq!(structure.metrics.z_size, reach.z);
        assert!(reach.z > 0.5);
    }

    #[test]
    fn test_ground_is_optional() {
        let (tree, leaf) = stump_and_square();
        let grounded = Assembler::new(AssemblyConfig::seeded(5)).build(&tree, &leaf).unwrap();
        assert_eq!(grounded.named("Floor").count(), 1);
        assert_eq!(grounded.named("FloorTop").count(), 1);
        assert_eq!(grounded.daughters()[0].material, "pv-concrete");

        let config = AssemblyConfig { include_ground: false, ..AssemblyConfig::seeded(5) };
        let bare = Assembler::new(config).build(&tree, &leaf).unwrap();
        assert_eq!(bare.named("Floor").count(), 0);
        assert_eq!(bare.named("Trunk").count(), 2);
    }

    #[test]
    fn test_leaf_volumes_nest_three_layers() {
        let (tree, leaf) = stump_and_square();
        let structure = Assembler::new(AssemblyConfig::seeded(7)).build(&tree, &leaf).unwrap();
        for envelope in structure.named("LeafEnvelope") {
            let names: Vec<&str> = envelope.children.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(names, ["LeafFront", "LeafSensitive", "LeafBack"]);
            assert_eq!(envelope.children[1].material, "pv-silicon");
        }
    }

    #[test]
    fn test_lone_leaf() {
        let leaf = LeafSystem::new(LeafSpecies::Planar);
        let structure = Assembler::new(AssemblyConfig::default()).build_leaf(&leaf).unwrap();
        assert_eq!(structure.metrics.leaf_count, 1);
        assert_eq!(structure.metrics.rejected_leaf_count, 0);
        // unit square plus a 0.3 mm skirt on four sides
        assert!((structure.metrics.sensitive_area - 1.0012).abs() < 1e-6);

        let reach = DVec3::new(structure.metrics.x_size, structure.metrics.y_size, structure.metrics.z_size);
        let expected = 3f64.sqrt() * (reach * LEAF_WORLD_SCALE).length();
        assert!((structure.metrics.world_radius - expected).abs() < 1e-9);
        assert_eq!(structure.daughters().len(), 1);
    }

    #[test]
    fn test_leaf_pushed_into_a_sibling_is_rejected() {
        let assembler = Assembler::new(AssemblyConfig::seeded(17));
        let leaves = LeafBuilder::new(&LeafSystem::new(LeafSpecies::Planar)).unwrap();
        let mut structure = Structure::new(Volume::new("World", "pv-air", Orb::new(DVec3::ZERO, 10.0)));
        let mut checker = OverlapChecker::new(assembler.config());

        let pose = Turtle::with_frame(DVec3::new(0.0, 0.0, 1.0), DVec3::Z, DVec3::new(-1.0, 0.0, 0.0));
        let first = leaves.shells(&pose).unwrap();
        assert!(assembler.try_place_leaf(&mut structure, first, None, &mut checker));
        let placed = structure.metrics.clone();
        assert_eq!(placed.leaf_count, 1);
        assert_eq!(placed.rejected_leaf_count, 0);

        // Shift a copy by less than half the leaf thickness along its normal
        let surface = leaves.surface(&pose).unwrap();
        let [a, b, c] = [surface[0][0], surface[0][1], surface[0][2]];
        let normal = (b - a).cross(c - a).normalize();
        let mut pushed = pose.clone();
        pushed.position += normal * (0.3 * leaves.thickness());
        let sibling = leaves.shells(&pushed).unwrap();
        assert!(!assembler.try_place_leaf(&mut structure, sibling, None, &mut checker));

        assert_eq!(structure.metrics.leaf_count, placed.leaf_count);
        assert_eq!(structure.metrics.rejected_leaf_count, placed.rejected_leaf_count + 1);
        assert_eq!(structure.metrics.sensitive_area, placed.sensitive_area);
        assert_eq!(structure.daughters().len(), 1);

        let mut apart = pose.clone();
        apart.position += DVec3::new(3.0, 3.0, 3.0);
        let distant = leaves.shells(&apart).unwrap();
        assert!(assembler.try_place_leaf(&mut structure, distant, None, &mut checker));
        assert_eq!(structure.metrics.leaf_count, 2);
        assert_eq!(structure.metrics.rejected_leaf_count, 1);
    }

    #[test]
    fn test_base_leaf_poses_turn_sideways() {
        let mut turtle = Turtle::with_frame(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.0, 1.0, 0.0));
        turtle.width = 0.04;
        let [right, left] = base_leaf_poses(&turtle, 0.0);

        assert!((right.orientation - DVec3::new(0.0, -1.0, 1.0)).length() < 1e-12);
        assert!((left.orientation - DVec3::new(0.0, 1.0, 1.0)).length() < 1e-12);
        assert!((right.l_vector - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
        assert!((left.l_vector - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
        assert!((right.length - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_cone_base_leaves_shorten() {
        let mut turtle = Turtle::with_frame(DVec3::ZERO, DVec3::X, DVec3::Y);
        turtle.width = 0.04;
        let [pose, _] = base_leaf_poses(&turtle, std::f64::consts::FRAC_PI_3);
        assert!((pose.length - 0.01).abs() < 1e-12);
    }
}
