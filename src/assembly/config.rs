//! Assembly settings: overlap sampling, leaf placement policy and materials.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Material names handed to the geometry sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Materials {
    pub trunk: String,
    pub floor: String,
    /// World and leaf envelopes
    pub air: String,
    pub leaf_front: String,
    pub leaf_sensitive: String,
    pub leaf_back: String,
}

impl Default for Materials {
    fn default() -> Self {
        Self {
            trunk: "pv-aluminium".to_string(),
            floor: "pv-concrete".to_string(),
            air: "pv-air".to_string(),
            leaf_front: "pv-glass".to_string(),
            leaf_sensitive: "pv-silicon".to_string(),
            leaf_back: "pv-glass".to_string(),
        }
    }
}

/// Configuration for building a plant structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Surface points sampled per candidate leaf.
    pub resolution: usize,
    /// Penetration depth tolerated before a sample counts as a violation (m).
    pub tolerance: f64,
    /// Violations that reject a leaf.
    pub maximum_error_number: usize,
    /// Seed for overlap sampling; `None` draws from OS entropy.
    pub overlap_seed: Option<u64>,
    /// Non-terminal branches thinner than this half width get base leaves (m).
    pub thin_branch_half_width: f64,
    /// End terminal branches in a point instead of a constant radius.
    pub taper_terminal_branches: bool,
    /// Place the floor slab and dome.
    pub include_ground: bool,
    pub materials: Materials,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            resolution: 1000,
            tolerance: 0.0,
            maximum_error_number: 1,
            overlap_seed: None,
            thin_branch_half_width: 0.04,
            taper_terminal_branches: false,
            include_ground: true,
            materials: Materials::default(),
        }
    }
}

impl AssemblyConfig {
    /// Default settings with a fixed overlap seed.
    pub fn seeded(seed: u64) -> Self {
        Self { overlap_seed: Some(seed), ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
