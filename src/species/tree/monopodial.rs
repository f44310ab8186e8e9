//! Monopodial branching: one leader with alternating lateral shoots.

use std::fmt;

use crate::core::Result;
use crate::core::number::Compact;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialHeight", 1.0, 0.0, 2.0),
            ("initialWidth", 0.2, 0.1, 0.4),
            ("initialOrientation", 67.0, 0.0, 360.0),
            ("contractionRatio1", 0.9, 0.55, 0.9),
            ("contractionRatio2", 0.7, 0.3, 0.8),
            ("branchingAngle1", 45.0, 10.0, 110.0),
            ("branchingAngle2", 60.0, 10.0, 120.0),
            ("divergenceAngle", 137.5, 0.0, 180.0),
            ("widthDecreaseRate", 0.707, 0.7, 0.8),
        ],
        &[("iterationNumber", 6, 4, 8)],
    )
}

/// `/(o)A(h,w)`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Monopodial>>> {
    Ok(Successor::new()
        .op(Op::Roll(params.double("initialOrientation")?))
        .rule(Monopodial::Leader {
            length: params.double("initialHeight")?,
            width: params.double("initialWidth")?,
        })
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Monopodial {
    /// `A(l,w)`
    Leader { length: f64, width: f64 },
    /// `B(l,w)`: lateral shoot turning right
    Right { length: f64, width: f64 },
    /// `C(l,w)`: lateral shoot turning left
    Left { length: f64, width: f64 },
}

impl Rule for Monopodial {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let main = ctx.double("contractionRatio1")?;
        let lateral = ctx.double("contractionRatio2")?;
        let decrease = ctx.double("widthDecreaseRate")?;
        let first_angle = ctx.double("branchingAngle1")?;
        let second_angle = ctx.double("branchingAngle2")?;
        let divergence = ctx.double("divergenceAngle")?;

        let out = match *self {
            Monopodial::Leader { length, width } => Successor::new()
                .op(Op::Width { width, rate: None })
                .op(Op::Advance(length))
                .branch(|b| {
                    b.op(Op::Pitch(first_angle))
                        .rule(Monopodial::Right { length: length * lateral, width: width * decrease })
                })
                .op(Op::Roll(divergence))
                .rule(Monopodial::Leader { length: length * main, width: width * decrease }),
            Monopodial::Right { length, width } => Successor::new()
                .op(Op::Width { width, rate: None })
                .op(Op::Advance(length))
                .branch(|b| {
                    b.op(Op::TurnRight(second_angle))
                        .op(Op::Nop)
                        .rule(Monopodial::Left { length: length * lateral, width: width * decrease })
                })
                .rule(Monopodial::Left { length: length * main, width: width * decrease }),
            Monopodial::Left { length, width } => Successor::new()
                .op(Op::Width { width, rate: None })
                .op(Op::Advance(length))
                .branch(|b| {
                    b.op(Op::TurnLeft(second_angle))
                        .op(Op::Nop)
                        .rule(Monopodial::Right { length: length * lateral, width: width * decrease })
                })
                .rule(Monopodial::Right { length: length * main, width: width * decrease }),
        };
        Ok(out.build())
    }
}

impl fmt::Display for Monopodial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, length, width) = match *self {
            Monopodial::Leader { length, width } => ('A', length, width),
            Monopodial::Right { length, width } => ('B', length, width),
            Monopodial::Left { length, width } => ('C', length, width),
        };
        write!(f, "{}({},{})", name, Compact(length), Compact(width))
    }
}
