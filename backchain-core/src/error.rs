//! Error types.
//!
//! Only genuine failures live here. Solvability verdicts, registry index
//! fallbacks and swallowed persistence failures are ordinary results.

use thiserror::Error;

use crate::persistence::migration::MigrationError;

/// Template lookup failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no room template registered with id `{0}`")]
    UnknownTemplate(String),
    #[error("room template `{0}` is already registered")]
    DuplicateTemplate(String),
    #[error("room registry is empty")]
    Empty,
}

/// Save store and save blob failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save migration failed: {0:?}")]
    Migration(MigrationError),
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}
