//! Sympodial branching: every segment ends in two diverging shoots.

use std::fmt;

use crate::core::Result;
use crate::core::number::Compact;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialHeight", 1.0, 0.001, 2.0),
            ("initialWidth", 0.2, 0.01, 0.4),
            ("initialOrientation", 67.0, 0.0, 360.0),
            ("contractionRatio1", 0.75, 0.1, 0.9),
            ("contractionRatio2", 0.68, 0.1, 0.8),
            ("branchingAngle1", 28.0, 5.0, 90.0),
            ("branchingAngle2", 48.0, 5.0, 90.0),
            ("widthDecreaseRate", 0.67, 0.1, 0.9),
        ],
        &[("iterationNumber", 6, 3, 8)],
    )
}

/// `/(o)A(h,w)`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Sympodial>>> {
    Ok(Successor::new()
        .op(Op::Roll(params.double("initialOrientation")?))
        .rule(Sympodial::Trunk {
            length: params.double("initialHeight")?,
            width: params.double("initialWidth")?,
        })
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Sympodial {
    /// `A(l,w)`: the trunk, splitting into two pitched shoots
    Trunk { length: f64, width: f64 },
    /// `B(l,w)`: a shoot splitting into two turned shoots
    Shoot { length: f64, width: f64 },
}

impl Rule for Sympodial {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let first = ctx.double("contractionRatio1")?;
        let second = ctx.double("contractionRatio2")?;
        let decrease = ctx.double("widthDecreaseRate")?;
        let first_angle = ctx.double("branchingAngle1")?;
        let second_angle = ctx.double("branchingAngle2")?;

        let (length, width) = match *self {
            Sympodial::Trunk { length, width } | Sympodial::Shoot { length, width } => (length, width),
        };
        let first_shoot = Sympodial::Shoot { length: length * first, width: width * decrease };
        let second_shoot = Sympodial::Shoot { length: length * second, width: width * decrease };

        let out = Successor::new()
            .op(Op::Width { width, rate: None })
            .op(Op::Advance(length));
        let out = match self {
            Sympodial::Trunk { .. } => out
                .branch(|b| b.op(Op::Pitch(first_angle)).rule(first_shoot))
                .op(Op::Roll(180.0))
                .branch(|b| b.op(Op::Pitch(second_angle)).rule(second_shoot)),
            Sympodial::Shoot { .. } => out
                .branch(|b| b.op(Op::TurnLeft(first_angle)).op(Op::Nop).rule(first_shoot))
                .branch(|b| b.op(Op::TurnRight(second_angle)).op(Op::Nop).rule(second_shoot)),
        };
        Ok(out.build())
    }
}

impl fmt::Display for Sympodial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Sympodial::Trunk { length, width } => write!(f, "A({},{})", Compact(length), Compact(width)),
            Sympodial::Shoot { length, width } => write!(f, "B({},{})", Compact(length), Compact(width)),
        }
    }
}
