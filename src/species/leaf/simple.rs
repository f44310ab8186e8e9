//! Simple and rose leaves: a growing midrib with lateral veins, each
//! generation adding four quads of triangles around the apex.
//!
//! Both species share these productions and differ only in defaults.

use std::fmt;

use crate::core::Result;
use crate::core::number::Compact;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

use super::planar::scale_growth;

/// Time indices closer to zero than this count as the first generation.
const FIRST_GENERATION: f64 = 0.0001;

pub fn simple_defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialAngle", 90.0, 0.0, 360.0),
            ("mainInitialLength", 0.05, 0.01, 0.09),
            ("mainGrowthRate", 0.75, 0.5, 1.1),
            ("lateralInitialLength", 0.02, 0.005, 0.04),
            ("lateralGrowthRate", 0.8, 0.8, 1.3),
            ("growthPotentialDecrease", 1.0, 1.0, 1.0),
            ("divergenceAngle", 75.0, 45.0, 140.0),
            ("thickness", 0.01, 0.002, 0.06),
        ],
        &[("iterationNumber", 4, 4, 8)],
    )
}

pub fn rose_defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialAngle", 90.0, 0.0, 360.0),
            ("mainInitialLength", 0.2, 0.03, 0.2),
            ("mainGrowthRate", 0.9, 0.5, 0.9),
            ("lateralInitialLength", 0.05, 0.03, 0.08),
            ("lateralGrowthRate", 1.2, 0.8, 1.3),
            ("growthPotentialDecrease", 1.0, 1.0, 1.0),
            ("divergenceAngle", 71.0, 45.0, 140.0),
            ("thickness", 0.01, 0.002, 0.06),
        ],
        &[("iterationNumber", 5, 4, 8)],
    )
}

/// `/(a)[A(0)]`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Simple>>> {
    Ok(Successor::new()
        .op(Op::Roll(params.double("initialAngle")?))
        .branch(|b| b.rule(Simple::Apex(0.0)))
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Simple {
    /// `A(t)`: the midrib apex at time index `t`
    Apex(f64),
    /// `B(t)`: a lateral vein with growth potential `t`
    Vein(f64),
}

impl Rule for Simple {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let lateral = Op::Grow {
            elongation: ctx.double("lateralInitialLength")?,
            rate: Some(ctx.double("lateralGrowthRate")?),
        };

        match *self {
            Simple::Vein(t) => Ok(Successor::new()
                .op(lateral)
                .rule(Simple::Vein(t - ctx.double("growthPotentialDecrease")?))
                .build()),
            Simple::Apex(t) => {
                let main_length = ctx.double("mainInitialLength")?;
                let main_rate = Some(ctx.double("mainGrowthRate")?);
                let main = Op::Grow { elongation: main_length, rate: main_rate };
                let back = Op::Grow { elongation: -main_length, rate: main_rate };
                let divergence = ctx.double("divergenceAngle")?;
                let left = Op::Pitch(-divergence);
                let right = Op::Pitch(divergence);
                let vein = Simple::Vein(t);
                let older = Simple::Vein(t - 1.0);

                let mut out = Successor::new();
                if t.abs() > FIRST_GENERATION {
                    out = out.op(main);
                }

                // Polygons span sibling branches, so brackets and braces are
                // written out rather than nested.
                let out = out
                    // [{&(-d)B(t).][.G(-m).}]
                    .op(Op::Push).op(Op::BeginPolygon).op(left).rule(vein.clone()).op(Op::Vertex).op(Op::Pop)
                    .op(Op::Push).op(Op::Vertex).op(back).op(Op::Vertex).op(Op::EndPolygon).op(Op::Pop)
                    // [{G(-m).&(-d)G(l)B(t-1).][&(-d)B(t).}]
                    .op(Op::Push).op(Op::BeginPolygon).op(back).op(Op::Vertex).op(left).op(lateral)
                    .rule(older.clone()).op(Op::Vertex).op(Op::Pop)
                    .op(Op::Push).op(left).rule(vein.clone()).op(Op::Vertex).op(Op::EndPolygon).op(Op::Pop)
                    // [A(t+1)]
                    .branch(|b| b.rule(Simple::Apex(t + 1.0)))
                    // [{.&(d)B(t).][G(-m).}]
                    .op(Op::Push).op(Op::BeginPolygon).op(Op::Vertex).op(right).rule(vein.clone()).op(Op::Vertex).op(Op::Pop)
                    .op(Op::Push).op(back).op(Op::Vertex).op(Op::EndPolygon).op(Op::Pop)
                    // [{G(-m).][&(d)B(t).][G(-m)&(d)G(l)B(t-1).}]
                    .op(Op::Push).op(Op::BeginPolygon).op(back).op(Op::Vertex).op(Op::Pop)
                    .op(Op::Push).op(right).rule(vein).op(Op::Vertex).op(Op::Pop)
                    .op(Op::Push).op(back).op(right).op(lateral).rule(older).op(Op::Vertex).op(Op::EndPolygon).op(Op::Pop);
                Ok(out.build())
            }
        }
    }

    fn rewrite_op(op: Op, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        Ok(vec![Symbol::Op(scale_growth(op))])
    }
}

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Simple::Apex(t) => write!(f, "A({})", Compact(t)),
            Simple::Vein(t) => write!(f, "B({})", Compact(t)),
        }
    }
}
