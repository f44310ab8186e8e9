//! Layered leaf solids

pub mod builder;

pub use builder::{Layer, LeafBuilder, LeafShells, SURFACE_FILTER_TOLERANCE};
