//! # factmodel entity
//!
//! Instance state and transaction building for entity types declared with
//! `factmodel-schema`.
//!
//! ## Key Types
//!
//! - [`Entity`] - Current and previous attribute values of one record
//! - [`Fact`] - One unit of transaction data
//! - [`Validator`] / [`Errors`] - Seam for external validation rules
//!
//! ## Usage
//!
//! ```rust
//! use factmodel_entity::{EntityTypeExt, Fact};
//! use factmodel_schema::{AttributeOptions, EntityType, ValueType};
//!
//! let mut builder = EntityType::builder("Mouse");
//! builder.attribute("name", ValueType::String, AttributeOptions::new())?;
//! let mouse = builder.build()?;
//!
//! let mut jerry = mouse.create([("name", "Jerry")])?;
//! jerry.set("name", "Jerry Mouse")?;
//!
//! let facts = jerry.tx_data()?;
//! assert!(matches!(facts.as_slice(), [Fact::Entity(_)]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entity;
pub mod error;
pub mod tx;
pub mod validation;

pub use entity::{Entity, EntityTypeExt};
pub use error::{EntityError, Result};
pub use tx::{Fact, TxOp};
pub use validation::{Errors, Validator};
