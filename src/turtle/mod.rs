//! Turtle cursors and the forest they grow into

pub mod forest;
pub mod node;

pub use forest::TurtleForest;
pub use node::{Turtle, TurtleId};
