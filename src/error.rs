//! Operational errors.
//!
//! Rule failures are never errors: they travel as messages inside a
//! [`ValidationResult`](crate::functional::validation_engine::ValidationResult).
//! The types here cover configuration loading and form wiring only.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading engine settings or threshold tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read thresholds file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid thresholds JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("bounds for {field} are inverted (min {min} > max {max})")]
    InvertedBounds {
        field: String,
        min: usize,
        max: usize,
    },
}

/// Errors raised by [`FormSession`](crate::services::form_session::FormSession)
/// when events or wiring reference fields it cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field already registered: {0}")]
    DuplicateField(String),

    #[error("field {0} cannot depend on itself")]
    SelfDependency(String),

    #[error("dependency {dependent} -> {source_field} would create a cycle")]
    CyclicDependency {
        dependent: String,
        source_field: String,
    },

    #[error("shared form state is poisoned")]
    StatePoisoned,
}

pub type FormResult<T> = Result<T, FormError>;
