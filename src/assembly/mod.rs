//! Placing branches, ground and leaves into a single world volume.

pub mod builder;
pub mod config;
pub mod overlap;
pub mod structure;

pub use builder::{Assembler, tree_extents};
pub use config::{AssemblyConfig, Materials};
pub use overlap::OverlapChecker;
pub use structure::{GeometrySink, MaterialSummary, Metrics, Structure, Volume};
