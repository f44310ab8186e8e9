//! Named parameter storage and configuration overlays

pub mod config;
pub mod store;

pub use config::{ConfigValue, ParameterConfig, ParameterEntry, ParameterSource};
pub use store::{Parameter, ParameterStore, ParameterValue};
