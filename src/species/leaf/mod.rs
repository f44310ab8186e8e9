//! Surface grammars for leaf meshes

pub mod cordate;
pub mod planar;
pub mod simple;
