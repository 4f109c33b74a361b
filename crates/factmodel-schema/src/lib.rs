//! # factmodel schema
//!
//! The attribute registry: declare typed, named attributes on an entity
//! type and compile them into schema facts.
//!
//! ## Usage
//!
//! ```rust
//! use factmodel_schema::{AttributeOptions, EntityType, ValueType};
//!
//! let mut builder = EntityType::builder("Mouse");
//! builder
//!     .attribute("name", ValueType::String, AttributeOptions::new())?
//!     .attribute("tags", ValueType::Symbol, AttributeOptions::new().many())?;
//! let mouse = builder.build()?;
//!
//! assert_eq!(mouse.prefix(), "mouse");
//! assert_eq!(mouse.schema().len(), 2);
//! # Ok::<(), factmodel_schema::SchemaError>(())
//! ```

pub mod attribute;
pub mod entity_type;
pub mod error;
pub mod schema;

pub use attribute::{AttributeOptions, AttributeSpec, Cardinality, Uniqueness, ValueType};
pub use entity_type::{EntityType, EntityTypeBuilder};
pub use error::{Result, SchemaError};
pub use schema::ident;
