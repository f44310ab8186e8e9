//! Helical branching: a ring of stalks that spiral upward while splitting.

use std::fmt;

use crate::core::Result;
use crate::core::number::Compact;
use crate::lsystem::{Op, Rewriter, Rule, Successor, Symbol};
use crate::params::ParameterStore;

pub fn defaults() -> ParameterStore {
    ParameterStore::from_table(
        &[
            ("initialLength", 0.42, 0.3, 0.7),
            ("initialWidthEven", 0.2, 0.15, 0.25),
            ("initialWidthOdd", 0.23, 0.15, 0.25),
            ("initialRadius", 0.0, 0.0, 0.6),
            ("initialOrientation", 0.0, 0.0, 360.0),
            ("elongationRate", 0.93, 0.85, 0.93),
            ("branchElongation", 0.9, 0.9, 0.95),
            ("contractionRate", 0.85, 0.7, 0.85),
            ("minimumWidth", 0.015, 0.015, 0.035),
            ("turningAngle", 15.2, 12.2, 18.2),
            ("inclinationAngle", 90.0, 70.0, 90.0),
            ("incDecRate", 5.0, 4.0, 6.0),
            ("branchingAngle", 2.8, 1.4, 3.8),
        ],
        &[
            ("stepsBetweenSplit", 4, 4, 4),
            ("stalkPoints", 8, 2, 8),
            ("branchlessPoints", 0, 0, 0),
            ("iterationNumber", 17, 15, 18),
            ("simpleBranch", 0, 0, 0),
        ],
    )
}

/// `/(o)` followed by one `[/(i·360/n)&(90)f(r)+(90)&(-inc)A(l,w,0,0)]` per stalk.
pub fn axiom(params: &ParameterStore) -> Result<Vec<Symbol<Helical>>> {
    let stalks = params.integer("stalkPoints")?;
    let radius = params.double("initialRadius")?;
    let inclination = params.double("inclinationAngle")?;
    let length = params.double("initialLength")?;
    let even = params.double("initialWidthEven")?;
    let odd = params.double("initialWidthOdd")?;

    let mut axiom = Successor::new().op(Op::Roll(params.double("initialOrientation")?));
    for i in 0..stalks {
        let width = if i % 2 == 0 { even } else { odd };
        let roll = i as f64 * 360.0 / stalks as f64;
        axiom = axiom.branch(|b| {
            b.op(Op::Roll(roll))
                .op(Op::Pitch(90.0))
                .op(Op::Move(radius))
                .op(Op::TurnLeft(90.0))
                .op(Op::Pitch(-inclination))
                .rule(Helical::Stalk { length, width, angle: 0.0, count: 0 })
        });
    }
    Ok(axiom.build())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Helical {
    /// `A(l,w,a,n)`: a spiralling stalk segment
    Stalk { length: f64, width: f64, angle: f64, count: i64 },
    /// `B(l,w)`: a short side shoot
    Shoot { length: f64, width: f64 },
}

/// Width instruction clamped to the minimum stalk width.
fn width(ctx: &Rewriter<'_>, width: f64) -> Result<Op> {
    let minimum = ctx.double("minimumWidth")?;
    Ok(Op::Width { width: width.max(minimum), rate: None })
}

impl Rule for Helical {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        match *self {
            Helical::Stalk { length, width: w, angle, count } => {
                let branchless = ctx.integer("branchlessPoints")?;
                let steps = ctx.integer("stepsBetweenSplit")?;
                let turning = ctx.double("turningAngle")?;
                let elongation = ctx.double("elongationRate")?;
                let contraction = ctx.double("contractionRate")?;
                let next_angle = (angle + ctx.double("branchingAngle")?) % 360.0;

                let out = Successor::new()
                    .op(Op::Pitch(ctx.double("incDecRate")?))
                    .op(width(ctx, w)?)
                    .op(Op::Advance(length));

                let splits = count > branchless && steps != 0 && (count - branchless) % steps == 0;
                if !splits {
                    return Ok(out
                        .op(Op::TurnLeft(turning))
                        .rule(Helical::Stalk {
                            length: length * elongation,
                            width: w * contraction,
                            angle: next_angle,
                            count: count + 1,
                        })
                        .build());
                }

                if ctx.integer("simpleBranch")? != 1 {
                    let fork = Helical::Stalk {
                        length: length * elongation,
                        width: w * contraction * 0.8,
                        angle: next_angle,
                        count: count + 1,
                    };
                    Ok(out
                        .branch(|b| b.op(Op::Pitch(angle)).op(Op::TurnLeft(turning)).rule(fork.clone()))
                        .branch(|b| b.op(Op::Pitch(-angle)).op(Op::TurnLeft(turning)).rule(fork))
                        .build())
                } else {
                    Ok(out
                        .branch(|b| {
                            b.op(Op::Roll(angle))
                                .op(Op::Pitch(90.0))
                                .rule(Helical::Shoot { length: length / 10.0, width: w / 2.0 })
                        })
                        .op(Op::TurnLeft(turning))
                        .rule(Helical::Stalk {
                            length: length * elongation,
                            width: w * contraction,
                            angle: next_angle,
                            count: count + 1,
                        })
                        .build())
                }
            }
            Helical::Shoot { length, width: w } => Ok(Successor::new()
                .op(width(ctx, w)?)
                .op(Op::SetLength { length, elongation: ctx.double("branchElongation")? })
                .op(Op::Advance(length))
                .build()),
        }
    }

    fn rewrite_op(op: Op, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let op = match op {
            Op::SetLength { length, elongation } => Op::SetLength { length: length * elongation, elongation },
            other => other,
        };
        Ok(vec![Symbol::Op(op)])
    }
}

impl fmt::Display for Helical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Helical::Stalk { length, width, angle, count } => write!(
                f,
                "A({},{},{},{})",
                Compact(length),
                Compact(width),
                Compact(angle),
                count
            ),
            Helical::Shoot { length, width } => write!(f, "B({},{})", Compact(length), Compact(width)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::LSystem;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_axiom_has_one_branch_per_stalk() {
        let params = defaults();
        let system = LSystem::new(axiom(&params).unwrap());
        let text = system.to_string();
        assert!(text.starts_with("/(0)[/(0)&(90)f(0)+(90)&(-90)A(0.42,0.2,0,0)][/(45)&(90)f(0)+(90)&(-90)A(0.42,0.23,0,0)]"));
        assert_eq!(text.matches('[').count(), 8);
    }

    #[test]
    fn test_split_every_fourth_step() {
        let params = defaults();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = Rewriter::new(&params, &mut rng);
        let plain = Helical::Stalk { length: 1.0, width: 0.2, angle: 0.0, count: 1 }
            .rewrite(&mut ctx)
            .unwrap();
        assert!(!plain.iter().any(|s| *s == Symbol::Op(Op::Push)));

        let split = Helical::Stalk { length: 1.0, width: 0.2, angle: 0.0, count: 4 }
            .rewrite(&mut ctx)
            .unwrap();
        assert_eq!(split.iter().filter(|s| **s == Symbol::Op(Op::Push)).count(), 2);
    }

    #[test]
    fn test_width_is_clamped() {
        let params = defaults();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = Rewriter::new(&params, &mut rng);
        let shoot = Helical::Shoot { length: 0.1, width: 0.001 }.rewrite(&mut ctx).unwrap();
        assert_eq!(shoot[0], Symbol::Op(Op::Width { width: 0.015, rate: None }));
        assert_eq!(shoot[1].to_string(), "*(0.1,0.9)");
    }
}
