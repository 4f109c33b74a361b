//! Error types for the attribute registry.

use thiserror::Error;

/// Errors that can occur while declaring an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The type tag does not appear in the value-type table.
    #[error("unknown value type: {0}")]
    UnknownValueType(String),

    /// An attribute with this name was already declared on the type.
    #[error("attribute {attribute} already declared on {entity}")]
    DuplicateAttribute { entity: String, attribute: String },

    /// The namespace prefix is empty or contains a `/`.
    #[error("invalid namespace prefix: {0:?}")]
    InvalidPrefix(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
