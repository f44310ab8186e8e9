//! Grammar symbols and the rewriting contract.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::op::Op;
use crate::core::Result;
use crate::params::ParameterStore;

/// One symbol of a sequence: a turtle instruction or a dialect production.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol<R> {
    Op(Op),
    Rule(R),
}

impl<R: fmt::Display> fmt::Display for Symbol<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Op(op) => op.fmt(f),
            Symbol::Rule(rule) => rule.fmt(f),
        }
    }
}

/// State available to a rewrite: the grammar parameters and its generator.
pub struct Rewriter<'a> {
    params: &'a ParameterStore,
    rng: &'a mut StdRng,
}

impl<'a> Rewriter<'a> {
    pub fn new(params: &'a ParameterStore, rng: &'a mut StdRng) -> Self {
        Self { params, rng }
    }

    pub fn double(&self, name: &str) -> Result<f64> {
        self.params.double(name)
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.params.integer(name)
    }

    pub fn params(&self) -> &ParameterStore {
        self.params
    }

    /// Uniform draw in `[0, 1)` from the grammar generator.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn reseed(&mut self, seed: u64) {
        *self.rng = StdRng::seed_from_u64(seed);
    }
}

/// A dialect's productions.
///
/// Productions never act on the turtle; they only expand. Instructions are
/// copied unchanged by default, and a dialect may override
/// [`Rule::rewrite_op`] to grow or scale them each generation.
pub trait Rule: Clone + fmt::Debug + fmt::Display + Sized {
    fn rewrite(&self, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>>;

    fn rewrite_op(op: Op, ctx: &mut Rewriter<'_>) -> Result<Vec<Symbol<Self>>> {
        let _ = ctx;
        Ok(vec![Symbol::Op(op)])
    }
}

/// Builder for successor sequences.
#[derive(Clone, Debug)]
pub struct Successor<R> {
    symbols: Vec<Symbol<R>>,
}

impl<R> Default for Successor<R> {
    fn default() -> Self {
        Self { symbols: Vec::new() }
    }
}

impl<R> Successor<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(mut self, op: Op) -> Self {
        self.symbols.push(Symbol::Op(op));
        self
    }

    pub fn rule(mut self, rule: R) -> Self {
        self.symbols.push(Symbol::Rule(rule));
        self
    }

    /// Wrap the symbols added by `body` in `[` and `]`.
    pub fn branch(mut self, body: impl FnOnce(Self) -> Self) -> Self {
        self.symbols.push(Symbol::Op(Op::Push));
        let inner = body(Self::new());
        self.symbols.extend(inner.symbols);
        self.symbols.push(Symbol::Op(Op::Pop));
        self
    }

    /// Wrap the symbols added by `body` in `{` and `}`.
    pub fn polygon(mut self, body: impl FnOnce(Self) -> Self) -> Self {
        self.symbols.push(Symbol::Op(Op::BeginPolygon));
        let inner = body(Self::new());
        self.symbols.extend(inner.symbols);
        self.symbols.push(Symbol::Op(Op::EndPolygon));
        self
    }

    pub fn build(self) -> Vec<Symbol<R>> {
        self.symbols
    }
}
