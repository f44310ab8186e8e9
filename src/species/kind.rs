//! Species identifiers and per-species dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::leaf::{cordate, planar, simple};
use super::tree::{helical, monopodial, stochastic, stump, sympodial, ternary};
use crate::core::{Error, Result};
use crate::lsystem::{LSystem, Op, Rule, Symbol};
use crate::params::ParameterStore;

/// Built-in tree grammars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeSpecies {
    Helical,
    Monopodial,
    Stochastic,
    Stump,
    Sympodial,
    Ternary,
}

/// Built-in leaf grammars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafSpecies {
    Cordate,
    Planar,
    Rose,
    Simple,
}

/// A grammar expanded for its configured number of generations.
#[derive(Clone, Debug)]
pub struct Expansion {
    /// Turtle instructions of the final sequence
    pub program: Vec<Op>,
    /// The final sequence as text
    pub rules: String,
    pub generations: usize,
}

/// Rewrite `axiom` for `iterationNumber` generations.
fn expand<R: Rule>(axiom: Vec<Symbol<R>>, params: &ParameterStore) -> Result<Expansion> {
    let generations = usize::try_from(params.integer("iterationNumber")?).unwrap_or(0);
    let mut system = LSystem::new(axiom);
    system.iterate(params, generations)?;
    Ok(Expansion {
        program: system.program(),
        rules: system.to_string(),
        generations,
    })
}

fn render<R: Rule>(axiom: Vec<Symbol<R>>) -> String {
    LSystem::new(axiom).to_string()
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 6] = [
        TreeSpecies::Helical,
        TreeSpecies::Monopodial,
        TreeSpecies::Stochastic,
        TreeSpecies::Stump,
        TreeSpecies::Sympodial,
        TreeSpecies::Ternary,
    ];

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            TreeSpecies::Helical => "helical",
            TreeSpecies::Monopodial => "monopodial",
            TreeSpecies::Stochastic => "stochastic",
            TreeSpecies::Stump => "stump",
            TreeSpecies::Sympodial => "sympodial",
            TreeSpecies::Ternary => "ternary",
        }
    }

    /// Capitalized name used in printouts
    pub fn title(self) -> &'static str {
        match self {
            TreeSpecies::Helical => "Helical",
            TreeSpecies::Monopodial => "Monopodial",
            TreeSpecies::Stochastic => "Stochastic",
            TreeSpecies::Stump => "Stump",
            TreeSpecies::Sympodial => "Sympodial",
            TreeSpecies::Ternary => "Ternary",
        }
    }

    pub fn defaults(self) -> ParameterStore {
        match self {
            TreeSpecies::Helical => helical::defaults(),
            TreeSpecies::Monopodial => monopodial::defaults(),
            TreeSpecies::Stochastic => stochastic::defaults(),
            TreeSpecies::Stump => stump::defaults(),
            TreeSpecies::Sympodial => sympodial::defaults(),
            TreeSpecies::Ternary => ternary::defaults(),
        }
    }

    /// The axiom as text.
    pub fn initial_rules(self, params: &ParameterStore) -> Result<String> {
        Ok(match self {
            TreeSpecies::Helical => render(helical::axiom(params)?),
            TreeSpecies::Monopodial => render(monopodial::axiom(params)?),
            TreeSpecies::Stochastic => render(stochastic::axiom(params)?),
            TreeSpecies::Stump => render(stump::axiom(params)?),
            TreeSpecies::Sympodial => render(sympodial::axiom(params)?),
            TreeSpecies::Ternary => render(ternary::axiom(params)?),
        })
    }

    pub fn expand(self, params: &ParameterStore) -> Result<Expansion> {
        match self {
            TreeSpecies::Helical => expand(helical::axiom(params)?, params),
            TreeSpecies::Monopodial => expand(monopodial::axiom(params)?, params),
            TreeSpecies::Stochastic => expand(stochastic::axiom(params)?, params),
            TreeSpecies::Stump => expand(stump::axiom(params)?, params),
            TreeSpecies::Sympodial => expand(sympodial::axiom(params)?, params),
            TreeSpecies::Ternary => expand(ternary::axiom(params)?, params),
        }
    }
}

impl LeafSpecies {
    pub const ALL: [LeafSpecies; 4] = [
        LeafSpecies::Cordate,
        LeafSpecies::Planar,
        LeafSpecies::Rose,
        LeafSpecies::Simple,
    ];

    /// Registry name
    pub fn name(self) -> &'static str {
        match self {
            LeafSpecies::Cordate => "cordate",
            LeafSpecies::Planar => "planar",
            LeafSpecies::Rose => "rose",
            LeafSpecies::Simple => "simple",
        }
    }

    /// Capitalized name used in printouts
    pub fn title(self) -> &'static str {
        match self {
            LeafSpecies::Cordate => "Cordate",
            LeafSpecies::Planar => "Planar",
            LeafSpecies::Rose => "Rose",
            LeafSpecies::Simple => "Simple",
        }
    }

    pub fn defaults(self) -> ParameterStore {
        match self {
            LeafSpecies::Cordate => cordate::defaults(),
            LeafSpecies::Planar => planar::defaults(),
            LeafSpecies::Rose => simple::rose_defaults(),
            LeafSpecies::Simple => simple::simple_defaults(),
        }
    }

    /// The axiom as text.
    pub fn initial_rules(self, params: &ParameterStore) -> Result<String> {
        Ok(match self {
            LeafSpecies::Cordate => render(cordate::axiom(params)?),
            LeafSpecies::Planar => render(planar::axiom(params)?),
            LeafSpecies::Rose | LeafSpecies::Simple => render(simple::axiom(params)?),
        })
    }

    pub fn expand(self, params: &ParameterStore) -> Result<Expansion> {
        match self {
            LeafSpecies::Cordate => expand(cordate::axiom(params)?, params),
            LeafSpecies::Planar => expand(planar::axiom(params)?, params),
            LeafSpecies::Rose | LeafSpecies::Simple => expand(simple::axiom(params)?, params),
        }
    }
}

impl fmt::Display for TreeSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for LeafSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeSpecies {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.name() == s)
            .ok_or_else(|| Error::SpeciesNotFound { kind: "tree", name: s.to_string() })
    }
}

impl FromStr for LeafSpecies {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.name() == s)
            .ok_or_else(|| Error::SpeciesNotFound { kind: "leaf", name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_rules() {
        let cases = [
            (TreeSpecies::Monopodial, "/(67)A(1,0.2)"),
            (TreeSpecies::Stochastic, "RandomSeed(1234)!(0.05,1.6)F(0.37)/(314)A"),
            (TreeSpecies::Stump, "!(0.05)F(0.5)/(180)&(45)F(0.5)"),
            (TreeSpecies::Sympodial, "/(67)A(1,0.2)"),
            (TreeSpecies::Ternary, "!(0.02)F(0.07)/(67)A"),
        ];
        for (species, expected) in cases {
            assert_eq!(species.initial_rules(&species.defaults()).unwrap(), expected, "{species}");
        }

        let leaves = [
            (LeafSpecies::Cordate, "/(90)G(0)[A(1)][B(1)]"),
            (
                LeafSpecies::Planar,
                "G(0,1)/(0)[{&(90)G(0.5,1)/(90)&(90)G(0.5,1).&(90)G(1,1).&(90)G(1,1).}][/(180){&(90)G(0.5,1)/(90)&(90)G(0.5,1).&(90)G(1,1).&(90)G(1,1).}]",
            ),
            (LeafSpecies::Rose, "/(90)[A(0)]"),
            (LeafSpecies::Simple, "/(90)[A(0)]"),
        ];
        for (species, expected) in leaves {
            assert_eq!(species.initial_rules(&species.defaults()).unwrap(), expected, "{species}");
        }
    }

    #[test]
    fn test_names_round_trip() {
        for species in TreeSpecies::ALL {
            assert_eq!(species.name().parse::<TreeSpecies>().unwrap(), species);
        }
        for species in LeafSpecies::ALL {
            assert_eq!(species.name().parse::<LeafSpecies>().unwrap(), species);
        }
        assert!(matches!(
            "willow".parse::<TreeSpecies>(),
            Err(Error::SpeciesNotFound { kind: "tree", .. })
        ));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        for species in TreeSpecies::ALL {
            let mut params = species.defaults();
            params.set_integer("iterationNumber", 3);
            let a = species.expand(&params).unwrap();
            let b = species.expand(&params).unwrap();
            assert_eq!(a.rules, b.rules, "{species}");
            assert_eq!(a.program, b.program, "{species}");
            assert_eq!(a.generations, 3);
        }
    }

    #[test]
    fn test_zero_generations_keep_axiom() {
        let params = LeafSpecies::Cordate.defaults();
        let mut zero = params.clone();
        zero.set_integer("iterationNumber", 0);
        let expansion = LeafSpecies::Cordate.expand(&zero).unwrap();
        assert_eq!(expansion.rules, "/(90)G(0)[A(1)][B(1)]");
    }
}
