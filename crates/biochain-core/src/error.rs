//! Unified error types for the biochain workspace
//!
//! [`BiochainError`] is the common error representation at API boundaries.
//! Domain-specific errors (for example the formulation errors raised while a
//! model is being built) convert into it so callers can handle ingestion,
//! configuration and solving failures uniformly.
//!
//! # Example
//!
//! ```ignore
//! use biochain_core::{BiochainError, BiochainResult};
//!
//! fn run(dir: &str) -> BiochainResult<()> {
//!     let data = load_data_dir(dir)?.into_data()?;
//!     let model = formulate(&data, &params, variant)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all biochain operations.
#[derive(Error, Debug)]
pub enum BiochainError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed or inconsistent network data or parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal invariant violated while assembling a model
    #[error("Model build error: {0}")]
    ModelBuild(String),

    /// Solver reported a non-optimal status
    #[error("Solver error: {0}")]
    Solver(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using BiochainError.
pub type BiochainResult<T> = Result<T, BiochainError>;

impl From<anyhow::Error> for BiochainError {
    fn from(err: anyhow::Error) -> Self {
        BiochainError::Other(format!("{err:#}"))
    }
}

impl From<String> for BiochainError {
    fn from(s: String) -> Self {
        BiochainError::Other(s)
    }
}

impl From<&str> for BiochainError {
    fn from(s: &str) -> Self {
        BiochainError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for BiochainError {
    fn from(err: serde_json::Error) -> Self {
        BiochainError::Parse(err.to_string())
    }
}
