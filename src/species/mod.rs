//! Built-in plant species: defaults, grammars and the name registry

pub mod kind;
pub mod leaf;
pub mod registry;
pub mod system;
pub mod tree;

pub use kind::{Expansion, LeafSpecies, TreeSpecies};
pub use registry::Registry;
pub use system::{LeafSystem, TreeSystem};
