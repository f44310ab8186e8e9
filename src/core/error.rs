//! Error types for plant generation

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parameter \"{name}\" does not exist ({kind} namespace)")]
    ParameterNotFound { kind: &'static str, name: String },

    #[error("Invalid range for \"{name}\": minimum {minimum} is above maximum {maximum}")]
    InvalidRange {
        name: String,
        minimum: f64,
        maximum: f64,
    },

    #[error("Cannot find {kind} with name = {name}")]
    SpeciesNotFound { kind: &'static str, name: String },

    #[error("Cannot record two {kind} constructors with the same name = {name}")]
    DuplicateRegistration { kind: &'static str, name: String },

    #[error("Structural contract violation: {0}")]
    StructuralContractViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a structural contract violation.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::StructuralContractViolation(message.into())
    }
}
