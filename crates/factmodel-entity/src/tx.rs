//! Transaction data.
//!
//! Changes to an [`Entity`] are expressed as facts rather than row
//! updates. Cardinality-one attributes are collected into a single entity
//! map; cardinality-many attributes are diffed against their previous set
//! into a retraction followed by an addition.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

use factmodel_core::{EntityId, EntityRef, Keyword, Value, ValueSet};
use factmodel_schema::{ident, Cardinality};

use crate::entity::Entity;
use crate::error::{EntityError, Result};

/// Direction of a list-form fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxOp {
    Add,
    Retract,
}

impl TxOp {
    /// `:db/add` or `:db/retract`.
    pub fn ident(self) -> Keyword {
        match self {
            TxOp::Add => ident::add(),
            TxOp::Retract => ident::retract(),
        }
    }
}

/// One unit of transaction data.
#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    /// Map form: `{:db/id e, :ns/attr v, ...}`.
    Entity(BTreeMap<Keyword, Value>),

    /// List form: `[op e a #{v ...}]`.
    Assertion {
        op: TxOp,
        entity: EntityRef,
        attribute: Keyword,
        values: ValueSet,
    },

    /// `[:db.fn/retractEntity id]`.
    RetractEntity(EntityId),
}

impl Fact {
    /// Render as plain data for the serialization layer.
    pub fn to_value(&self) -> Value {
        match self {
            Fact::Entity(map) => Value::Map(map.clone()),
            Fact::Assertion {
                op,
                entity,
                attribute,
                values,
            } => Value::Vector(vec![
                Value::Keyword(op.ident()),
                entity.clone().into(),
                Value::Keyword(attribute.clone()),
                Value::Set(values.clone()),
            ]),
            Fact::RetractEntity(id) => {
                Value::Vector(vec![Value::Keyword(ident::retract_entity()), (*id).into()])
            }
        }
    }

    /// The entity this fact is about.
    pub fn entity_ref(&self) -> Option<EntityRef> {
        match self {
            Fact::Entity(map) => match map.get(&ident::id())? {
                Value::Integer(id) => Some(EntityRef::Id(EntityId(*id))),
                Value::TempId(tmp) => Some(EntityRef::Temp(tmp.clone())),
                _ => None,
            },
            Fact::Assertion { entity, .. } => Some(entity.clone()),
            Fact::RetractEntity(id) => Some(EntityRef::Id(*id)),
        }
    }
}

impl Serialize for Fact {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl Entity {
    /// Transaction data for the given attributes, or for every changed
    /// attribute when `names` is empty.
    ///
    /// The entity reference is resolved once, so every fact produced by a
    /// call names the same permanent or temporary id.
    pub fn build_transaction(&self, names: &[&str]) -> Result<Vec<Fact>> {
        let mut names: Vec<&str> = if names.is_empty() {
            self.changed_attributes()
        } else {
            names.to_vec()
        };
        let mut seen = HashSet::new();
        names.retain(|name| seen.insert(*name));
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let entity_type = self.entity_type();
        let entity_ref = self.entity_ref();
        let mut entity_map = BTreeMap::new();
        let mut facts = Vec::new();

        for name in names {
            let spec = self.spec(name)?;
            let attribute = entity_type.ident(name);

            match spec.cardinality {
                Cardinality::One => {
                    let value = self.get(name).cloned().unwrap_or(Value::Nil);
                    entity_map.insert(attribute, value);
                }
                Cardinality::Many => {
                    let previous = self
                        .changed_from(name)
                        .cloned()
                        .map(Value::into_set)
                        .unwrap_or_default();
                    let current = self
                        .get(name)
                        .cloned()
                        .map(Value::into_set)
                        .unwrap_or_default();

                    let retractions = previous.difference(&current);
                    let additions = current.difference(&previous);

                    if !retractions.is_empty() {
                        facts.push(Fact::Assertion {
                            op: TxOp::Retract,
                            entity: entity_ref.clone(),
                            attribute: attribute.clone(),
                            values: retractions,
                        });
                    }
                    if !additions.is_empty() {
                        facts.push(Fact::Assertion {
                            op: TxOp::Add,
                            entity: entity_ref.clone(),
                            attribute,
                            values: additions,
                        });
                    }
                }
            }
        }

        if !entity_map.is_empty() {
            entity_map.insert(ident::id(), entity_ref.clone().into());
            facts.push(Fact::Entity(entity_map));
        }

        tracing::debug!(
            entity = %entity_type.name(),
            entity_ref = %entity_ref,
            facts = facts.len(),
            "built transaction"
        );
        Ok(facts)
    }

    /// Transaction data for every changed attribute.
    pub fn tx_data(&self) -> Result<Vec<Fact>> {
        self.build_transaction(&[])
    }

    /// A fact retracting the whole entity.
    pub fn destroy(&self) -> Result<Fact> {
        let id = self
            .id()
            .ok_or_else(|| EntityError::NotPersisted(self.entity_type().name().to_string()))?;
        tracing::debug!(entity = %self.entity_type().name(), id = %id, "retracting entity");
        Ok(Fact::RetractEntity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityTypeExt;
    use factmodel_core::{partition, EntityId, TempId, TempRefCounter};
    use factmodel_schema::{AttributeOptions, EntityType, EntityTypeBuilder, ValueType};
    use std::sync::Arc;

    fn mouse() -> Arc<EntityType> {
        let mut builder = EntityType::builder("Mouse");
        builder
            .attribute("name", ValueType::String, AttributeOptions::new())
            .unwrap()
            .attribute("tags", ValueType::Symbol, AttributeOptions::new().many())
            .unwrap();
        builder.build().unwrap()
    }

    fn kw(name: &str) -> Value {
        Value::Keyword(Keyword::new(name))
    }

    fn kws(names: &[&str]) -> ValueSet {
        names.iter().map(|n| kw(n)).collect()
    }

    fn tags(names: &[&str]) -> Value {
        Value::Vector(names.iter().map(|n| kw(n)).collect())
    }

    #[test]
    fn test_nothing_dirty_is_empty() {
        let ty = mouse();
        let m = ty.create([("name", "Jerry")]).unwrap();
        assert!(m.tx_data().unwrap().is_empty());
    }

    #[test]
    fn test_one_cardinality_uses_new_value() {
        let ty = mouse();
        let mut m = ty.create([("name", "x")]).unwrap();
        m.set("name", "y").unwrap();

        let facts = m.build_transaction(&[]).unwrap();
        assert_eq!(facts.len(), 1);

        let Fact::Entity(map) = &facts[0] else {
            panic!("expected map fact, got {:?}", facts[0]);
        };
        assert_eq!(map.get(&Keyword::namespaced("mouse", "name")), Some(&Value::from("y")));
        assert_eq!(
            map.get(&ident::id()),
            Some(&Value::TempId(m.temporary_id()))
        );
    }

    #[test]
    fn test_many_cardinality_retract_then_add() {
        let ty = mouse();
        let mut m = ty.create([("tags", tags(&["a", "b"]))]).unwrap();
        m.set("tags", tags(&["b", "c"])).unwrap();

        let facts = m.tx_data().unwrap();
        assert_eq!(
            facts,
            vec![
                Fact::Assertion {
                    op: TxOp::Retract,
                    entity: m.entity_ref(),
                    attribute: Keyword::namespaced("mouse", "tags"),
                    values: kws(&["a"]),
                },
                Fact::Assertion {
                    op: TxOp::Add,
                    entity: m.entity_ref(),
                    attribute: Keyword::namespaced("mouse", "tags"),
                    values: kws(&["c"]),
                },
            ]
        );
    }

    #[test]
    fn test_added_tag_only() {
        let ty = mouse();
        let mut m = ty
            .create([("name", Value::from("Jerry")), ("tags", tags(&["fast"]))])
            .unwrap();
        m.set("tags", tags(&["fast", "sneaky"])).unwrap();

        let facts = m.tx_data().unwrap();
        assert_eq!(facts.len(), 1);
        assert!(matches!(
            &facts[0],
            Fact::Assertion { op: TxOp::Add, values, .. } if *values == kws(&["sneaky"])
        ));
    }

    #[test]
    fn test_map_fact_emitted_last() {
        let ty = mouse();
        let mut m = ty.create(Vec::<(&str, Value)>::new()).unwrap();
        m.set("name", "Jerry").unwrap();
        m.set("tags", kw("fast")).unwrap();

        let facts = m.tx_data().unwrap();
        assert_eq!(facts.len(), 2);
        assert!(matches!(facts[0], Fact::Assertion { op: TxOp::Add, .. }));
        assert!(matches!(facts[1], Fact::Entity(_)));
    }

    #[test]
    fn test_one_entity_ref_per_call() {
        let ty = mouse();
        let mut m = ty.create([("tags", tags(&["a"]))]).unwrap();
        m.set("tags", tags(&["b"])).unwrap();
        m.set("name", "Jerry").unwrap();

        let facts = m.tx_data().unwrap();
        let refs: Vec<_> = facts.iter().map(|f| f.entity_ref().unwrap()).collect();
        assert_eq!(refs.len(), 3);
        assert!(refs.iter().all(|r| *r == refs[0]));
    }

    #[test]
    fn test_explicit_names_include_clean_attributes() {
        let ty = mouse();
        let m = ty
            .create([("name", Value::from("Jerry")), ("tags", tags(&["fast"]))])
            .unwrap();

        let facts = m.build_transaction(&["name", "tags"]).unwrap();
        assert_eq!(facts.len(), 2);
        assert!(matches!(
            &facts[0],
            Fact::Assertion { op: TxOp::Add, values, .. } if *values == kws(&["fast"])
        ));
        assert!(matches!(facts[1], Fact::Entity(_)));
    }

    #[test]
    fn test_explicit_unknown_name() {
        let ty = mouse();
        let m = ty.create([("name", "Jerry")]).unwrap();
        assert!(matches!(
            m.build_transaction(&["whiskers"]),
            Err(EntityError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_cleared_one_attribute_is_nil_in_map() {
        let ty = mouse();
        let mut m = ty.create([("name", "Jerry")]).unwrap();
        m.set("name", Value::Nil).unwrap();

        let facts = m.tx_data().unwrap();
        assert_eq!(facts.len(), 1);
        let Fact::Entity(map) = &facts[0] else {
            panic!("expected entity map, got {:?}", facts[0]);
        };
        assert_eq!(map[&Keyword::namespaced("mouse", "name")], Value::Nil);
        assert_eq!(map[&ident::id()], Value::from(m.entity_ref()));
    }

    #[test]
    fn test_named_unset_one_attribute_emits_map() {
        let ty = mouse();
        let m = Entity::with_defaults(&ty).unwrap();

        let facts = m.build_transaction(&["name"]).unwrap();
        assert_eq!(facts.len(), 1);
        let json = serde_json::to_value(&facts).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                ":db/id": { "#db/id": [":db.part/user", m.temporary_reference()] },
                ":mouse/name": null,
            }])
        );
    }

    #[test]
    fn test_repeated_names_processed_once() {
        let ty = mouse();
        let mut m = ty.create([("tags", tags(&["a", "b"]))]).unwrap();
        m.set("tags", tags(&["b", "c"])).unwrap();
        m.set("name", "Jerry").unwrap();

        let facts = m.build_transaction(&["tags", "name", "tags", "name"]).unwrap();
        assert_eq!(facts.len(), 3);
        assert!(matches!(&facts[0], Fact::Assertion { op: TxOp::Retract, .. }));
        assert!(matches!(&facts[1], Fact::Assertion { op: TxOp::Add, .. }));
        assert!(matches!(&facts[2], Fact::Entity(map) if map.len() == 2));
    }

    #[test]
    fn test_persisted_entity_uses_permanent_id() {
        let ty = mouse();
        let mut m = ty
            .from_query(vec![Value::Integer(99), Value::from("Jerry"), tags(&["fast"])])
            .unwrap();
        m.set("name", "Tom").unwrap();

        let facts = m.tx_data().unwrap();
        assert_eq!(facts[0].entity_ref(), Some(EntityRef::Id(EntityId(99))));
        assert_eq!(
            facts[0].to_value(),
            Value::Map(
                [
                    (ident::id(), Value::Integer(99)),
                    (Keyword::namespaced("mouse", "name"), Value::from("Tom")),
                ]
                .into_iter()
                .collect()
            )
        );
    }

    #[test]
    fn test_temp_id_in_type_partition() {
        let counter = Arc::new(TempRefCounter::starting_at(-5000));
        let mut builder = EntityTypeBuilder::new("Mouse", counter);
        builder
            .partition(Keyword::namespaced("db.part", "mice"))
            .attribute("name", ValueType::String, AttributeOptions::new())
            .unwrap();
        let ty = builder.build().unwrap();

        let mut m = ty.create(Vec::<(&str, Value)>::new()).unwrap();
        m.set("name", "Jerry").unwrap();
        let facts = m.tx_data().unwrap();

        assert_eq!(
            facts[0].entity_ref(),
            Some(EntityRef::Temp(TempId::new(
                Keyword::namespaced("db.part", "mice"),
                -5000
            )))
        );
        assert_ne!(ty.partition(), &partition::user());
    }

    #[test]
    fn test_assertion_to_value() {
        let fact = Fact::Assertion {
            op: TxOp::Retract,
            entity: EntityRef::Id(EntityId(5)),
            attribute: Keyword::namespaced("mouse", "tags"),
            values: kws(&["slow"]),
        };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(
            json,
            serde_json::json!([":db/retract", 5, ":mouse/tags", [":slow"]])
        );
    }

    #[test]
    fn test_destroy() {
        let ty = mouse();
        let m = ty.create([("name", "Jerry")]).unwrap();
        assert_eq!(m.destroy(), Err(EntityError::NotPersisted("Mouse".into())));

        let saved = ty
            .from_query(vec![Value::Integer(12), Value::from("Jerry"), Value::Nil])
            .unwrap();
        let fact = saved.destroy().unwrap();
        assert_eq!(fact, Fact::RetractEntity(EntityId(12)));
        assert_eq!(
            serde_json::to_value(&fact).unwrap(),
            serde_json::json!([":db.fn/retractEntity", 12])
        );
    }
}
