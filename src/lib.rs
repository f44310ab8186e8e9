//! Pvtree - parametric L-system plants with closed leaf meshes
//!
//! Grammars rewrite a symbol sequence, a turtle interpreter turns the result
//! into a branch skeleton or a leaf surface, and the assembler places branch
//! frustums and extruded leaves while rejecting overlapping leaves.

pub mod core;
pub mod math;
pub mod params;
pub mod turtle;
pub mod lsystem;
pub mod species;
pub mod mesh;
pub mod solid;
pub mod leaf;
pub mod assembly;
