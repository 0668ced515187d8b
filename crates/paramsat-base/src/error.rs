//! Unified error types for paramsat.

use thiserror::Error;

/// The main error type for paramsat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The model being compiled is malformed: duplicate or illegal names,
    /// forward references, empty domains, invalid family indices and so on.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A range-only and a binary-only integer were combined.
    #[error("Kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An expression was evaluated with a parameter left unbound.
    #[error("Undefined parameter: {0}")]
    UndefinedParameter(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The external solver could not be driven.
    #[error("Solver error: {0}")]
    Solver(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidModel`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidModel(message.into())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
