//! L-system rewriting and turtle interpretation

pub mod engine;
pub mod interpret;
pub mod op;
pub mod rule;

pub use engine::LSystem;
pub use interpret::{Interpretation, interpret};
pub use op::Op;
pub use rule::{Rewriter, Rule, Successor, Symbol};
