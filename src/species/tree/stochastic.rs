//! Stochastic branching: each node sprouts up to three shoots with a
//! decaying probability, and exhausted shoots end in leaf twigs.
//!
//! Draws come from the grammar generator, reseeded by the leading
//! `RandomSeed` symbol so a fixed `seed` parameter reproduces the tree.

use std::fmt;

use crate::core::Result;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialHeight", 0.37, 0.3, 0.57),
            ("initialWidth", 0.05, 0.04, 0.07),
            ("initialOrientation", 314.0, 0.0, 360.0),
            ("elongationRate", 1.15, 1.1, 1.25),
            ("widthIncreaseRate", 1.6, 1.4, 1.8),
            ("branchingAngle", 21.0, 11.0, 31.0),
            ("branchingAngle2", 31.0, 11.0, 41.0),
            ("divergenceAngle1", 99.0, 70.0, 120.0),
            ("divergenceAngle2", 167.0, 147.0, 177.0),
            ("angleToVertical", 12.0, 10.0, 15.0),
            ("lengthScale", 0.18, 0.15, 0.24),
            ("lengthScale2", 0.098, 0.09, 0.12),
            ("branchProbReduction", 0.67, 0.57, 0.77),
            ("initialBranchProb", 0.9, 0.8, 0.95),
        ],
        &[
            ("leafIterationNumber", 2, 2, 4),
            ("totalLeafIterations", 3, 2, 4),
            ("iterationNumber", 7, 5, 8),
            ("seed", 1234, 1234, 1234),
        ],
    )
}

/// `RandomSeed(s)!(w,r)F(h)/(o)A`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Stochastic>>> {
    Ok(Successor::new()
        .op(Op::Seed(params.integer("seed")? as u64))
        .op(Op::Width {
            width: params.double("initialWidth")?,
            rate: Some(params.double("widthIncreaseRate")?),
        })
        .op(Op::Advance(params.double("initialHeight")?))
        .op(Op::Roll(params.double("initialOrientation")?))
        .rule(Stochastic::Apex { probability: params.double("initialBranchProb")?, depth: 0 })
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stochastic {
    /// `A`: a node branching with `probability` at nesting `depth`
    Apex { probability: f64, depth: i64 },
    /// `B(n)`: a leaf twig with `n` generations left
    Twig(i64),
}

impl Rule for Stochastic {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let width = Op::Width {
            width: ctx.double("initialWidth")?,
            rate: Some(ctx.double("widthIncreaseRate")?),
        };
        let divergence = [ctx.double("divergenceAngle1")?, ctx.double("divergenceAngle2")?];

        match *self {
            Stochastic::Apex { probability, depth } => {
                let scale = ctx.double("lengthScale")?;
                let angle = ctx.double("branchingAngle")?;
                let reduction = ctx.double("branchProbReduction")?;
                let leaf_depth = ctx.integer("leafIterationNumber")?;
                let twig_generations = ctx.integer("totalLeafIterations")?;

                let mut out = Successor::new().op(width).op(Op::Advance(scale));
                for group in 0..3 {
                    let shoot = if ctx.uniform() < probability {
                        Some(Stochastic::Apex { probability: probability * reduction, depth: depth + 1 })
                    } else if depth > leaf_depth {
                        Some(Stochastic::Twig(twig_generations))
                    } else {
                        None
                    };
                    out = out.branch(|b| match shoot {
                        Some(rule) => b.op(Op::Pitch(angle)).op(Op::Advance(scale)).rule(rule),
                        None => b,
                    });
                    if let Some(&roll) = divergence.get(group) {
                        out = out.op(Op::Roll(roll));
                    }
                }
                Ok(out.build())
            }
            Stochastic::Twig(remaining) => {
                if remaining < 0 {
                    return Ok(Vec::new());
                }
                let scale = ctx.double("lengthScale2")?;
                let angle = ctx.double("branchingAngle2")?;
                let twig = |b: Successor<Stochastic>| {
                    b.op(Op::Pitch(angle)).op(Op::Advance(scale)).rule(Stochastic::Twig(remaining - 1))
                };

                Ok(Successor::new()
                    .op(width)
                    .op(Op::Verticate(ctx.double("angleToVertical")?))
                    .op(Op::Advance(scale))
                    .branch(twig)
                    .op(Op::Roll(divergence[0]))
                    .branch(twig)
                    .op(Op::Roll(divergence[1]))
                    .branch(twig)
                    .build())
            }
        }
    }

    /// Segments lengthen and widths grow by their own rate every generation.
    fn rewrite_op(op: Op, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let op = match op {
            Op::Advance(e) => Op::Advance(ctx.double("elongationRate")? * e),
            Op::Width { width, rate: Some(rate) } => Op::Width { width: rate * width, rate: Some(rate) },
            other => other,
        };
        Ok(vec![Symbol::Op(op)])
    }
}

impl fmt::Display for Stochastic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stochastic::Apex { .. } => f.write_str("A"),
            Stochastic::Twig(remaining) => write!(f, "B({})", remaining),
        }
    }
}
