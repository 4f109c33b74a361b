//! Attribute declarations.
//!
//! An [`AttributeSpec`] is the registry's record of one declared attribute:
//! its value type, cardinality, uniqueness, indexing flags, documentation
//! and default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use factmodel_core::{Keyword, Value};

use crate::error::SchemaError;

/// Semantic value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Symbol,
    String,
    Integer,
    Float,
    Decimal,
    Timestamp,
    Uri,
}

impl ValueType {
    /// Every supported value type.
    pub const ALL: [ValueType; 7] = [
        ValueType::Symbol,
        ValueType::String,
        ValueType::Integer,
        ValueType::Float,
        ValueType::Decimal,
        ValueType::Timestamp,
        ValueType::Uri,
    ];

    /// Name of the store type this value type maps to.
    pub fn db_type(self) -> &'static str {
        match self {
            ValueType::Symbol => "keyword",
            ValueType::String => "string",
            ValueType::Integer => "long",
            ValueType::Float => "float",
            ValueType::Decimal => "bigdec",
            ValueType::Timestamp => "instant",
            ValueType::Uri => "uri",
        }
    }

    /// The `:db.type/...` keyword for this value type.
    pub fn ident(self) -> Keyword {
        Keyword::namespaced("db.type", self.db_type())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ValueType::Symbol => "symbol",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Decimal => "decimal",
            ValueType::Timestamp => "timestamp",
            ValueType::Uri => "uri",
        };
        f.write_str(tag)
    }
}

/// Parses a semantic type tag. Store type names are accepted as aliases.
impl FromStr for ValueType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "symbol" | "keyword" => Ok(ValueType::Symbol),
            "string" => Ok(ValueType::String),
            "integer" | "long" => Ok(ValueType::Integer),
            "float" => Ok(ValueType::Float),
            "decimal" | "bigdec" => Ok(ValueType::Decimal),
            "timestamp" | "instant" | "time" => Ok(ValueType::Timestamp),
            "uri" => Ok(ValueType::Uri),
            _ => Err(SchemaError::UnknownValueType(s.to_string())),
        }
    }
}

/// How many values an attribute holds per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

impl Cardinality {
    /// The `:db.cardinality/...` keyword.
    pub fn ident(self) -> Keyword {
        let name = match self {
            Cardinality::One => "one",
            Cardinality::Many => "many",
        };
        Keyword::namespaced("db.cardinality", name)
    }
}

/// Uniqueness constraint on an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uniqueness {
    /// Duplicate values are rejected.
    Value,
    /// Duplicate values resolve to the existing entity (upsert).
    Identity,
}

impl Uniqueness {
    /// The `:db.unique/...` keyword.
    pub fn ident(self) -> Keyword {
        let name = match self {
            Uniqueness::Value => "value",
            Uniqueness::Identity => "identity",
        };
        Keyword::namespaced("db.unique", name)
    }
}

/// Options accepted when declaring an attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeOptions {
    pub index: bool,
    pub unique: Option<Uniqueness>,
    pub cardinality: Cardinality,
    pub doc: Option<String>,
    pub fulltext: bool,
    pub default: Option<Value>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn unique(mut self, unique: Uniqueness) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Shorthand for `cardinality(Cardinality::Many)`.
    pub fn many(self) -> Self {
        self.cardinality(Cardinality::Many)
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn fulltext(mut self) -> Self {
        self.fulltext = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A declared attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub name: String,
    pub value_type: ValueType,
    pub cardinality: Cardinality,
    pub unique: Option<Uniqueness>,
    pub indexed: bool,
    pub fulltext: bool,
    pub doc: Option<String>,
    /// Default applied at construction. Held as a set for `Many`.
    pub default: Option<Value>,
}

impl AttributeSpec {
    /// Build a spec from declaration options.
    pub fn new(name: impl Into<String>, value_type: ValueType, options: AttributeOptions) -> Self {
        let default = match options.cardinality {
            Cardinality::Many => options.default.map(|v| Value::Set(v.into_set())),
            Cardinality::One => options.default,
        };

        Self {
            name: name.into(),
            value_type,
            cardinality: options.cardinality,
            unique: options.unique,
            indexed: options.index,
            fulltext: options.fulltext,
            doc: options.doc,
            default,
        }
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}
