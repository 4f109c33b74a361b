//! Schema generation.
//!
//! Each declared attribute compiles to one schema fact: a keyword-keyed map
//! installing the attribute into the `:db.part/db` partition.

use std::collections::BTreeMap;

use factmodel_core::{partition, Keyword, TempId, Value};

use crate::attribute::AttributeSpec;
use crate::entity_type::EntityType;

/// Keywords of the store's own vocabulary.
pub mod ident {
    use factmodel_core::Keyword;

    fn db(name: &str) -> Keyword {
        Keyword::namespaced("db", name)
    }

    pub fn id() -> Keyword {
        db("id")
    }

    pub fn ident() -> Keyword {
        db("ident")
    }

    pub fn value_type() -> Keyword {
        db("valueType")
    }

    pub fn cardinality() -> Keyword {
        db("cardinality")
    }

    pub fn unique() -> Keyword {
        db("unique")
    }

    pub fn index() -> Keyword {
        db("index")
    }

    pub fn fulltext() -> Keyword {
        db("fulltext")
    }

    pub fn doc() -> Keyword {
        db("doc")
    }

    pub fn install_attribute() -> Keyword {
        Keyword::namespaced("db.install", "_attribute")
    }

    pub fn add() -> Keyword {
        db("add")
    }

    pub fn retract() -> Keyword {
        db("retract")
    }

    pub fn retract_entity() -> Keyword {
        Keyword::namespaced("db.fn", "retractEntity")
    }
}

impl AttributeSpec {
    /// The schema fact installing this attribute under `prefix`.
    pub fn schema_fact(&self, prefix: &str) -> BTreeMap<Keyword, Value> {
        let mut fact = BTreeMap::new();
        fact.insert(ident::id(), Value::TempId(TempId::schema()));
        fact.insert(ident::cardinality(), Value::Keyword(self.cardinality.ident()));
        fact.insert(ident::install_attribute(), Value::Keyword(partition::db()));
        fact.insert(
            ident::ident(),
            Value::Keyword(factmodel_core::namespace(prefix, &self.name)),
        );
        fact.insert(ident::value_type(), Value::Keyword(self.value_type.ident()));

        if let Some(unique) = self.unique {
            fact.insert(ident::unique(), Value::Keyword(unique.ident()));
        }
        if self.indexed {
            fact.insert(ident::index(), Value::Boolean(true));
        }
        if self.fulltext {
            fact.insert(ident::fulltext(), Value::Boolean(true));
        }
        if let Some(doc) = &self.doc {
            fact.insert(ident::doc(), Value::String(doc.clone()));
        }

        fact
    }
}

impl EntityType {
    /// Schema facts for every attribute, in declaration order.
    pub fn schema(&self) -> Vec<Value> {
        let facts: Vec<Value> = self
            .attributes()
            .iter()
            .map(|attr| Value::Map(attr.schema_fact(self.prefix())))
            .collect();

        tracing::debug!(entity = %self.name(), facts = facts.len(), "generated schema");
        facts
    }
}
