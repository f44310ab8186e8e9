//! Cordate (heart-shaped) leaves: two curling lobes filled with a fan of
//! triangles.

use std::fmt;

use crate::core::Result;
use crate::core::number::Compact;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialAngle", 90.0, 70.0, 120.0),
            ("divergenceAngle", 15.0, 10.0, 20.0),
            ("curlAngle", 8.0, 3.0, 15.0),
            ("growthRate", 0.1, 0.05, 0.3),
            ("stemLength", 0.0, 0.0, 0.0),
            ("thickness", 0.01, 0.002, 0.06),
        ],
        &[("iterationNumber", 5, 3, 5)],
    )
}

/// `/(a)G(s)[A(1)][B(1)]`
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Cordate>>> {
    Ok(Successor::new()
        .op(Op::Roll(params.double("initialAngle")?))
        .op(Op::Grow { elongation: params.double("stemLength")?, rate: None })
        .branch(|b| b.rule(Cordate::Left(1.0)))
        .branch(|b| b.rule(Cordate::Right(1.0)))
        .build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cordate {
    /// `A(f)`: left lobe with curl direction `f`
    Left(f64),
    /// `B(f)`: right lobe with curl direction `f`
    Right(f64),
    /// `C`: midrib growth
    Midrib,
}

impl Rule for Cordate {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let out = match *self {
            // [/(f·c)&(d)A(f){.].C.}
            Cordate::Left(direction) => Successor::new()
                .op(Op::Push)
                .op(Op::Roll(direction * ctx.double("curlAngle")?))
                .op(Op::Pitch(ctx.double("divergenceAngle")?))
                .rule(Cordate::Left(direction))
                .op(Op::BeginPolygon)
                .op(Op::Vertex)
                .op(Op::Pop)
                .op(Op::Vertex)
                .rule(Cordate::Midrib)
                .op(Op::Vertex)
                .op(Op::EndPolygon),
            // [/(-f·c)&(-d)B(f){.][C.].C}
            Cordate::Right(direction) => Successor::new()
                .op(Op::Push)
                .op(Op::Roll(-direction * ctx.double("curlAngle")?))
                .op(Op::Pitch(-ctx.double("divergenceAngle")?))
                .rule(Cordate::Right(direction))
                .op(Op::BeginPolygon)
                .op(Op::Vertex)
                .op(Op::Pop)
                .branch(|b| b.rule(Cordate::Midrib).op(Op::Vertex))
                .op(Op::Vertex)
                .rule(Cordate::Midrib)
                .op(Op::EndPolygon),
            Cordate::Midrib => Successor::new()
                .op(Op::Grow { elongation: ctx.double("growthRate")?, rate: None })
                .rule(Cordate::Midrib),
        };
        Ok(out.build())
    }
}

impl fmt::Display for Cordate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cordate::Left(direction) => write!(f, "A({})", Compact(direction)),
            Cordate::Right(direction) => write!(f, "B({})", Compact(direction)),
            Cordate::Midrib => f.write_str("C"),
        }
    }
}
