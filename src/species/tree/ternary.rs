//! Ternary branching: three shoots per node, thickening with age.

use std::fmt;

use crate::core::Result;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialHeight", 0.07, 0.04, 0.1),
            ("initialWidth", 0.02, 0.01, 0.04),
            ("initialOrientation", 67.0, 0.0, 360.0),
            ("elongationRate", 1.2, 1.0, 1.4),
            ("widthIncreaseRate", 1.9, 1.2, 1.9),
            ("branchingAngle", 18.95, 5.0, 30.0),
            ("divergenceAngle1", 94.74, 70.0, 140.0),
            ("divergenceAngle2", 132.63, 70.0, 140.0),
            ("lengthScale", 0.2, 0.1, 0.3),
        ],
        &[("iterationNumber", 7, 4, 7)],
    )
}

/// `!(w)F(h)/(o)A`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Ternary>>> {
    Ok(Successor::new()
        .op(Op::Width { width: params.double("initialWidth")?, rate: None })
        .op(Op::Advance(params.double("initialHeight")?))
        .op(Op::Roll(params.double("initialOrientation")?))
        .rule(Ternary::Apex)
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Ternary {
    /// `A`
    Apex,
}

impl Rule for Ternary {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let width = ctx.double("initialWidth")?;
        let scale = ctx.double("lengthScale")?;
        let angle = ctx.double("branchingAngle")?;
        let shoot = |b: Successor<Ternary>| b.op(Op::Pitch(angle)).op(Op::Advance(scale)).rule(Ternary::Apex);

        Ok(Successor::new()
            .op(Op::Width { width, rate: None })
            .op(Op::Advance(scale))
            .branch(shoot)
            .op(Op::Roll(ctx.double("divergenceAngle1")?))
            .branch(shoot)
            .op(Op::Roll(ctx.double("divergenceAngle2")?))
            .branch(shoot)
            .build())
    }

    /// Segments lengthen and thicken every generation.
    fn rewrite_op(op: Op, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let op = match op {
            Op::Advance(e) => Op::Advance(ctx.double("elongationRate")? * e),
            Op::Width { width, rate: None } => Op::Width {
                width: ctx.double("widthIncreaseRate")? * width,
                rate: None,
            },
            other => other,
        };
        Ok(vec![Symbol::Op(op)])
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("A")
    }
}
