//! Left-to-right rewriting of a symbol sequence.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::op::Op;
use super::rule::{Rewriter, Rule, Symbol};
use crate::core::Result;
use crate::params::ParameterStore;

/// Seed of the grammar generator before any `RandomSeed` is rewritten.
pub const DEFAULT_GRAMMAR_SEED: u64 = 0;

/// A symbol sequence with the generator its productions draw from.
#[derive(Clone, Debug)]
pub struct LSystem<R> {
    symbols: Vec<Symbol<R>>,
    rng: StdRng,
    generation: usize,
}

impl<R: Rule> LSystem<R> {
    pub fn new(axiom: Vec<Symbol<R>>) -> Self {
        Self {
            symbols: axiom,
            rng: StdRng::seed_from_u64(DEFAULT_GRAMMAR_SEED),
            generation: 0,
        }
    }

    /// Replace every symbol by its successors, in order.
    ///
    /// `RandomSeed` reseeds the generator and is consumed, so productions
    /// to its right already draw from the new stream.
    pub fn step(&mut self, params: &ParameterStore) -> Result<()> {
        let mut next = Vec::with_capacity(self.symbols.len() * 2);
        let mut ctx = Rewriter::new(params, &mut self.rng);

        for symbol in &self.symbols {
            match symbol {
                Symbol::Op(Op::Seed(seed)) => ctx.reseed(*seed),
                Symbol::Op(op) => next.extend(R::rewrite_op(*op, &mut ctx)?),
                Symbol::Rule(rule) => next.extend(rule.rewrite(&mut ctx)?),
            }
        }

        self.symbols = next;
        self.generation += 1;
        Ok(())
    }

    /// Apply `count` rewriting steps.
    pub fn iterate(&mut self, params: &ParameterStore, count: usize) -> Result<()> {
        for _ in 0..count {
            self.step(params)?;
        }
        log::debug!(
            "Rewrote {} generations, {} symbols",
            self.generation,
            self.symbols.len()
        );
        Ok(())
    }

    pub fn symbols(&self) -> &[Symbol<R>] {
        &self.symbols
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The turtle instructions of the current sequence; productions are skipped.
    pub fn program(&self) -> Vec<Op> {
        self.symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::Op(op) => Some(*op),
                Symbol::Rule(_) => None,
            })
            .collect()
    }
}

impl<R: fmt::Display> fmt::Display for LSystem<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            symbol.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsystem::rule::Successor;

    /// Algae-like test grammar: `X -> F(1)[X]X`, `F` doubles, `C` coin flip.
    #[derive(Clone, Debug, PartialEq)]
    enum Test {
        X,
        Coin,
    }

    impl fmt::Display for Test {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Test::X => f.write_str("X"),
                Test::Coin => f.write_str("C"),
            }
        }
    }

    impl Rule for Test {
        fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
            Ok(match self {
                Test::X => Successor::new()
                    .op(Op::Advance(ctx.double("step")?))
                    .branch(|b| b.rule(Test::X))
                    .rule(Test::X)
                    .build(),
                Test::Coin => {
                    let angle = ctx.uniform() * 360.0;
                    Successor::new().op(Op::Roll(angle)).build()
                }
            })
        }

        fn rewrite_op(op: Op, _ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
            Ok(vec![Symbol::Op(match op {
                Op::Advance(e) => Op::Advance(2.0 * e),
                other => other,
            })])
        }
    }

    fn params() -> ParameterStore {
        let mut params = ParameterStore::new();
        params.set_double("step", 1.0);
        params
    }

    #[test]
    fn test_rewrite_order() {
        let mut system = LSystem::new(vec![Symbol::Rule(Test::X)]);
        assert_eq!(system.to_string(), "X");
        system.iterate(&params(), 2).unwrap();
        assert_eq!(system.to_string(), "F(2)[F(1)[X]X]F(1)[X]X");
        assert_eq!(system.generation(), 2);
    }

    #[test]
    fn test_program_skips_productions() {
        let mut system = LSystem::new(vec![Symbol::Rule(Test::X)]);
        system.step(&params()).unwrap();
        assert_eq!(system.program(), vec![Op::Advance(1.0), Op::Push, Op::Pop]);
    }

    #[test]
    fn test_missing_parameter_fails() {
        let mut system = LSystem::new(vec![Symbol::Rule(Test::X)]);
        assert!(system.step(&ParameterStore::new()).is_err());
    }

    #[test]
    fn test_seed_is_consumed_and_reseeds() {
        let axiom = || vec![Symbol::Op(Op::Seed(7)), Symbol::Rule(Test::Coin)];
        let mut a = LSystem::new(axiom());
        let mut b = LSystem::new(axiom());
        assert_eq!(a.to_string(), "RandomSeed(7)C");

        a.step(&params()).unwrap();
        b.step(&params()).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert!(!a.to_string().contains("RandomSeed"));

        let mut unseeded = LSystem::new(vec![Symbol::Rule(Test::Coin)]);
        unseeded.step(&params()).unwrap();
        assert_ne!(unseeded.to_string(), a.to_string());
    }
}
