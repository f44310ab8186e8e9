//! Parameterized grammar roots for trees and leaves.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::kind::{Expansion, LeafSpecies, TreeSpecies};
use crate::core::Result;
use crate::lsystem::{Interpretation, interpret};
use crate::params::{ParameterSource, ParameterStore};
use crate::turtle::Turtle;

/// A tree grammar together with its own parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSystem {
    species: TreeSpecies,
    parameters: ParameterStore,
}

/// A leaf grammar together with its own parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafSystem {
    species: LeafSpecies,
    parameters: ParameterStore,
}

macro_rules! grammar_system {
    ($system:ident, $species:ident) => {
        impl $system {
            /// Create a system holding the species defaults.
            pub fn new(species: $species) -> Self {
                Self { species, parameters: species.defaults() }
            }

            /// Create a system and overlay configured parameters.
            pub fn configured(species: $species, source: &dyn ParameterSource) -> Result<Self> {
                let mut system = Self::new(species);
                let applied = source.apply_to(species.name(), &mut system.parameters)?;
                if applied > 0 {
                    log::debug!("Applied {} configured parameters to {}", applied, species);
                }
                Ok(system)
            }

            pub fn species(&self) -> $species {
                self.species
            }

            pub fn parameters(&self) -> &ParameterStore {
                &self.parameters
            }

            pub fn parameters_mut(&mut self) -> &mut ParameterStore {
                &mut self.parameters
            }

            /// The axiom as text.
            pub fn initial_rules(&self) -> Result<String> {
                self.species.initial_rules(&self.parameters)
            }

            /// Rewrite for `iterationNumber` generations.
            pub fn expand(&self) -> Result<Expansion> {
                self.species.expand(&self.parameters)
            }

            /// Serialize to pretty JSON
            pub fn to_json(&self) -> Result<String> {
                Ok(serde_json::to_string_pretty(self)?)
            }

            /// Deserialize from JSON, rejecting inverted parameter ranges.
            pub fn from_json(json: &str) -> Result<Self> {
                let system: Self = serde_json::from_str(json)?;
                system.parameters.validate()?;
                Ok(system)
            }

            /// Save to file (sync)
            pub fn save(&self, path: &Path) -> Result<()> {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, self.to_json()?)?;
                Ok(())
            }

            /// Load from file (sync)
            pub fn load(path: &Path) -> Result<Self> {
                let json = std::fs::read_to_string(path)?;
                Self::from_json(&json)
            }
        }

        impl fmt::Display for $system {
            /// Parameter table followed by `Produced <Species> Rules = <axiom>`.
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let rules = self.initial_rules().map_err(|_| fmt::Error)?;
                f.write_str(&self.parameters.table())?;
                writeln!(f, "Produced {} Rules = {}", self.species.title(), rules)
            }
        }
    };
}

grammar_system!(TreeSystem, TreeSpecies);
grammar_system!(LeafSystem, LeafSpecies);

impl TreeSystem {
    /// Expand and replay the grammar from the default turtle.
    pub fn grow(&self) -> Result<Interpretation> {
        let expansion = self.expand()?;
        let out = interpret(&expansion.program, Turtle::default())?;
        log::info!(
            "Grew {} tree: {} generations, {} segments",
            self.species,
            expansion.generations,
            out.retired.len()
        );
        Ok(out)
    }
}
