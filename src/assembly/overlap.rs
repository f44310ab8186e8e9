//! Rejection sampling for candidate leaves.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::AssemblyConfig;
use super::structure::Volume;
use crate::solid::{Location, Solid, TessellatedSolid};

/// Samples candidate surfaces against everything already placed in the world.
pub struct OverlapChecker {
    resolution: usize,
    tolerance: f64,
    maximum_error_number: usize,
    rng: StdRng,
}

impl OverlapChecker {
    pub fn new(config: &AssemblyConfig) -> Self {
        let rng = match config.overlap_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            resolution: config.resolution,
            tolerance: config.tolerance,
            maximum_error_number: config.maximum_error_number.max(1),
            rng,
        }
    }

    /// Whether `candidate` pokes out of `world` or into any of its daughters.
    ///
    /// The daughter at index `parent` is the branch the leaf grows from and
    /// is allowed to overlap. Each other daughter is also checked once for
    /// lying inside the candidate.
    pub fn overlaps(&mut self, candidate: &TessellatedSolid, world: &Volume, parent: Option<usize>) -> bool {
        let mut violations = 0;

        for n in 0..self.resolution {
            let point = candidate.point_on_surface(&mut self.rng);

            if world.shape.location(point) == Location::Outside {
                let depth = world.shape.distance_to_in(point);
                if depth > self.tolerance {
                    violations += 1;
                    log::warn!(
                        "Leaf overlaps its mother volume {} at {:?} by at least {:.3e} m",
                        world.name,
                        point,
                        depth
                    );
                    if violations >= self.maximum_error_number {
                        return true;
                    }
                }
            }

            for (index, daughter) in world.children.iter().enumerate() {
                if Some(index) == parent {
                    continue;
                }

                if daughter.shape.location(point) == Location::Inside
                    && daughter.shape.distance_to_out(point) > self.tolerance
                {
                    violations += 1;
                    log::debug!(
                        "Leaf sample {:?} lies inside {} {} ({})",
                        point,
                        daughter.shape.kind(),
                        daughter.name,
                        index
                    );
                    if violations >= self.maximum_error_number {
                        return true;
                    }
                }

                // A daughter fully swallowed by the candidate never gets hit by its samples
                if n == 0 {
                    let probe = daughter.shape.point_on_surface(&mut self.rng);
                    if candidate.location(probe) == Location::Inside {
                        violations += 1;
                        if violations >= self.maximum_error_number {
                            return true;
                        }
                    }
                }
            }
        }

        violations > 0
    }
}
