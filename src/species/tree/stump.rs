//! Stump: a fixed bent stick with no productions.

use std::fmt;

use crate::core::Result;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialHeight", 0.5, 0.1, 1.0),
            ("initialWidth", 0.05, 0.01, 0.1),
            ("initialAzimuth", 180.0, 0.0, 360.0),
            ("initialElevation", 45.0, 0.0, 90.0),
        ],
        &[("iterationNumber", 0, 0, 0)],
    )
}

/// `!(w)F(h)/(az)&(90-el)F(h)`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Stump>>> {
    let height = params.double("initialHeight")?;
    Ok(Successor::new()
        .op(Op::Width { width: params.double("initialWidth")?, rate: None })
        .op(Op::Advance(height))
        .op(Op::Roll(params.double("initialAzimuth")?))
        .op(Op::Pitch(90.0 - params.double("initialElevation")?))
        .op(Op::Advance(height))
        .build())
}

/// The stump grammar has no productions.
#[derive(Clone, Debug, PartialEq)]
pub enum Stump {}

impl Rule for Stump {
    fn rewrite(&self, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        match *self {}
    }
}

impl fmt::Display for Stump {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
