//! Error types for the Specdeck core.
//!
//! Uses `thiserror` for public API error types. Data-layer failures
//! (`CatalogError`) never reach the comparison evaluator: the selection
//! manager converts them into side state.

use std::path::PathBuf;

use crate::params::Side;

/// Top-level error type for the Specdeck core library.
#[derive(Debug, thiserror::Error)]
pub enum SpecdeckError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a system data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("System not found: {slug}")]
    NotFound { slug: String },

    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Malformed catalog payload: {message}")]
    Malformed { message: String },
}

/// Usage errors of the selection manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Side {side} has no loaded system")]
    NotReady { side: Side },

    #[error("Side {side} has no variant '{variant}'")]
    UnknownVariant { side: Side, variant: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `SpecdeckError`.
pub type Result<T> = std::result::Result<T, SpecdeckError>;
