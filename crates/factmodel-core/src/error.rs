//! Error types for factmodel core primitives.

use thiserror::Error;

/// Errors raised while building or reading core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid keyword: {0:?}")]
    InvalidKeyword(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
