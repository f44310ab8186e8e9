//! Planar leaves: a square made of two right triangles.

use std::fmt;

use crate::core::Result;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialAngle", 0.0, 0.0, 360.0),
            ("initialEdgeLength", 1.0, 1.0, 1.0),
            ("mainGrowthRate", 1.0, 1.0, 1.0),
            ("offsetLength", 0.0, 0.0, 0.0),
            ("thickness", 0.01, 0.01, 0.01),
        ],
        &[("iterationNumber", 0, 0, 0)],
    )
}

/// `G(o,1)/(a)[T][/(180)T]` where `T` is one triangle.
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Planar>>> {
    let edge = params.double("initialEdgeLength")?;
    let rate = Some(params.double("mainGrowthRate")?);
    let half = Op::Grow { elongation: edge / 2.0, rate };
    let full = Op::Grow { elongation: edge, rate };

    // {&(90)G(e/2)/(90)&(90)G(e/2).&(90)G(e).&(90)G(e).}
    let triangle = |b: Successor<Planar>| {
        b.polygon(|p| {
            p.op(Op::Pitch(90.0))
                .op(half)
                .op(Op::Roll(90.0))
                .op(Op::Pitch(90.0))
                .op(half)
                .op(Op::Vertex)
                .op(Op::Pitch(90.0))
                .op(full)
                .op(Op::Vertex)
                .op(Op::Pitch(90.0))
                .op(full)
                .op(Op::Vertex)
        })
    };

    Ok(Successor::new()
        .op(Op::Grow { elongation: params.double("offsetLength")?, rate: Some(1.0) })
        .op(Op::Roll(params.double("initialAngle")?))
        .branch(triangle)
        .branch(|b| triangle(b.op(Op::Roll(180.0))))
        .build())
}

/// The planar grammar has no productions; its edges only scale.
#[derive(Clone, Debug, PartialEq)]
pub enum Planar {}

impl Rule for Planar {
    fn rewrite(&self, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        match *self {}
    }

    fn rewrite_op(op: Op, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        Ok(vec![Symbol::Op(scale_growth(op))])
    }
}

impl fmt::Display for Planar {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// `G(e,r) -> G(e·r,r)`
pub(crate) fn scale_growth(op: Op) -> Op {
    match op {
        Op::Grow { elongation, rate: Some(rate) } => Op::Grow { elongation: elongation * rate, rate: Some(rate) },
        other => other,
    }
}
