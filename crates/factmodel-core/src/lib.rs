//! # factmodel core
//!
//! Pure primitives shared by the registry and the transaction builder:
//! keywords, values and entity identity.
//!
//! This crate contains no I/O. It is plain data plus one atomic counter.
//!
//! ## Key Types
//!
//! - [`Keyword`] - Namespaced symbol such as `:mouse/name`
//! - [`Value`] - A datum exchanged with the serialization layer
//! - [`ValueSet`] - The value of a cardinality-many attribute
//! - [`EntityId`] / [`TempId`] / [`EntityRef`] - Permanent and temporary identity
//! - [`TempRefCounter`] - Source of temporary reference numbers

pub mod error;
pub mod keyword;
pub mod naming;
pub mod types;
pub mod value;

pub use error::{CoreError, Result};
pub use keyword::{namespace, Keyword};
pub use naming::derive_prefix;
pub use types::{partition, EntityId, EntityRef, TempId, TempRefCounter, SCHEMA_TEMP_REF};
pub use value::{Value, ValueSet};
