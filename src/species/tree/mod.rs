//! Branching grammars for tree skeletons

pub mod helical;
pub mod monopodial;
pub mod stochastic;
pub mod stump;
pub mod sympodial;
pub mod ternary;
