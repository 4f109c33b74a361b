//! Error types for entity instances.

use factmodel_core::CoreError;
use thiserror::Error;

/// Errors raised by entity state and transaction operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The attribute is not declared on the entity type.
    #[error("unknown attribute {attribute} on {entity}")]
    UnknownAttribute { entity: String, attribute: String },

    /// A query row does not have one value per declared attribute.
    #[error("query row arity mismatch: expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// The operation needs a permanent id but the entity was never saved.
    #[error("{0} instance is not persisted")]
    NotPersisted(String),

    /// The first element of a query row is not a usable entity id.
    #[error("invalid entity id in query row: {0}")]
    InvalidEntityId(String),

    /// A value could not be read as the requested type.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for entity operations.
pub type Result<T> = std::result::Result<T, EntityError>;
