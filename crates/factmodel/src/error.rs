//! Error types for the facade.

use factmodel_core::CoreError;
use factmodel_entity::EntityError;
use factmodel_schema::SchemaError;
use thiserror::Error;

/// Errors that can occur during model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Value error.
    #[error("value error: {0}")]
    Core(#[from] CoreError),

    /// Declaration error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Instance or transaction error.
    #[error("entity error: {0}")]
    Entity(#[from] EntityError),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
