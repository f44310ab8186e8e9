//! Name-to-constructor registry for grammar systems.

use std::collections::BTreeMap;

use super::kind::{LeafSpecies, TreeSpecies};
use super::system::{LeafSystem, TreeSystem};
use crate::core::{Error, Result};
use crate::params::ParameterSource;

type Constructor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Maps species names to constructors of fresh, independent systems.
pub struct Registry<T> {
    kind: &'static str,
    constructors: BTreeMap<String, Constructor<T>>,
}

impl<T> Registry<T> {
    /// An empty registry; `kind` labels errors ("tree" or "leaf").
    pub fn empty(kind: &'static str) -> Self {
        Self { kind, constructors: BTreeMap::new() }
    }

    /// Record a constructor under `name`.
    pub fn register(&mut self, name: &str, constructor: impl Fn() -> T + Send + Sync + 'static) -> Result<()> {
        if self.constructors.contains_key(name) {
            return Err(Error::DuplicateRegistration { kind: self.kind, name: name.to_string() });
        }
        self.constructors.insert(name.to_string(), Box::new(constructor));
        Ok(())
    }

    /// Build a fresh instance.
    pub fn create(&self, name: &str) -> Result<T> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::SpeciesNotFound { kind: self.kind, name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl Registry<TreeSystem> {
    /// Registry of the built-in tree species.
    pub fn trees() -> Self {
        let mut registry = Self::empty("tree");
        for species in TreeSpecies::ALL {
            registry
                .constructors
                .insert(species.name().to_string(), Box::new(move || TreeSystem::new(species)));
        }
        registry
    }

    /// Build a fresh instance and overlay configured parameters.
    pub fn create_configured(&self, name: &str, source: &dyn ParameterSource) -> Result<TreeSystem> {
        let mut system = self.create(name)?;
        source.apply_to(name, system.parameters_mut())?;
        Ok(system)
    }
}

impl Registry<LeafSystem> {
    /// Registry of the built-in leaf species.
    pub fn leaves() -> Self {
        let mut registry = Self::empty("leaf");
        for species in LeafSpecies::ALL {
            registry
                .constructors
                .insert(species.name().to_string(), Box::new(move || LeafSystem::new(species)));
        }
        registry
    }

    /// Build a fresh instance and overlay configured parameters.
    pub fn create_configured(&self, name: &str, source: &dyn ParameterSource) -> Result<LeafSystem> {
        let mut system = self.create(name)?;
        source.apply_to(name, system.parameters_mut())?;
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let trees = Registry::trees();
        assert_eq!(
            trees.names().collect::<Vec<_>>(),
            vec!["helical", "monopodial", "stochastic", "stump", "sympodial", "ternary"]
        );
        let leaves = Registry::leaves();
        assert_eq!(leaves.names().collect::<Vec<_>>(), vec!["cordate", "planar", "rose", "simple"]);
    }

    #[test]
    fn test_instances_are_independent() {
        let trees = Registry::trees();
        let mut first = trees.create("helical").unwrap();
        first.parameters_mut().set_double("initialLength", 4.6);
        let second = trees.create("helical").unwrap();
        assert_eq!(second.parameters().double("initialLength").unwrap(), 0.42);
    }

    #[test]
    fn test_unknown_species() {
        let err = Registry::leaves().create("fern").err().unwrap();
        assert_eq!(err.to_string(), "Cannot find leaf with name = fern");
    }

    #[test]
    fn test_duplicate_registration() {
        let mut trees = Registry::trees();
        let err = trees.register("stump", || TreeSystem::new(TreeSpecies::Stump)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot record two tree constructors with the same name = stump");

        trees.register("bonsai", || {
            let mut tree = TreeSystem::new(TreeSpecies::Sympodial);
            tree.parameters_mut().set_double("initialHeight", 0.1);
            tree
        }).unwrap();
        assert!(trees.contains("bonsai"));
        assert_eq!(trees.create("bonsai").unwrap().species(), TreeSpecies::Sympodial);
    }
}
