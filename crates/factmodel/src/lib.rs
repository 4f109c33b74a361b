//! # factmodel
//!
//! Declarative attribute models for append-only, fact-based datastores.
//!
//! ## Overview
//!
//! A type declares typed, named attributes once. From that declaration
//! factmodel derives:
//!
//! - **Schema**: one schema fact per attribute, ready to transact
//! - **Transactions**: additions and retractions computed from what changed
//! - **Re-hydration**: typed instances rebuilt from flat query rows
//!
//! ## Key Concepts
//!
//! - **Fact**: Updating an entity means emitting new facts, never overwriting.
//! - **Cardinality**: `one` attributes go into one entity map; `many`
//!   attributes are diffed into a retraction and an addition.
//! - **Temporary id**: New entities are named by a partition-scoped negative
//!   reference until the store assigns a permanent id.
//!
//! ## Usage
//!
//! ```rust
//! use factmodel::{AttributeOptions, EntityTypeExt, Session, Value, ValueType};
//!
//! let session = Session::default();
//!
//! let mut mouse = session.define("Mouse");
//! mouse
//!     .attribute("name", ValueType::String, AttributeOptions::new())?
//!     .attribute("tags", ValueType::Symbol, AttributeOptions::new().many())?;
//! let mouse = mouse.build()?;
//!
//! let schema = session.schema(&[&mouse]);
//! assert_eq!(schema.len(), 2);
//!
//! let mut jerry = mouse.create([("name", Value::from("Jerry"))])?;
//! jerry.set("tags", Value::Vector(vec!["fast".parse::<factmodel::Keyword>()?.into()]))?;
//!
//! let facts = session.transaction(&[&jerry])?;
//! assert_eq!(facts.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Re-exports
//!
//! The component crates are re-exported:
//!
//! - `factmodel::core` - Keywords, values and identity
//! - `factmodel::schema` - Attribute registry and schema generation
//! - `factmodel::entity` - Instance state and transaction building

pub mod error;
pub mod session;

// Re-export component crates
pub use factmodel_core as core;
pub use factmodel_entity as entity;
pub use factmodel_schema as schema;

pub use error::{ModelError, Result};
pub use session::{Session, SessionConfig};

// Re-export commonly used types
pub use factmodel_core::{
    namespace, EntityId, EntityRef, Keyword, TempId, TempRefCounter, Value, ValueSet,
};
pub use factmodel_entity::{Entity, EntityError, EntityTypeExt, Errors, Fact, TxOp, Validator};
pub use factmodel_schema::{
    AttributeOptions, AttributeSpec, Cardinality, EntityType, EntityTypeBuilder, SchemaError,
    Uniqueness, ValueType,
};
