//! The Session: shared context for a set of entity types.
//!
//! A session owns the temporary-reference counter, so every type defined
//! through it mints references from one sequence and entities of different
//! types never collide inside a transaction.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use factmodel_core::{partition, EntityId, Keyword, TempRefCounter, Value};
use factmodel_entity::{Entity, Fact};
use factmodel_schema::{EntityType, EntityTypeBuilder};

use crate::error::Result;

/// Configuration for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Partition for types that do not declare one.
    pub default_partition: Keyword,
    /// First temporary reference handed out.
    pub temp_ref_start: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_partition: partition::user(),
            temp_ref_start: TempRefCounter::DEFAULT_START,
        }
    }
}

/// Shared context for declaring types and assembling transactions.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    counter: Arc<TempRefCounter>,
}

impl Session {
    /// Create a session.
    pub fn new(config: SessionConfig) -> Self {
        let counter = Arc::new(TempRefCounter::starting_at(config.temp_ref_start));
        Self { config, counter }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The counter shared by every type defined in this session.
    pub fn counter(&self) -> &Arc<TempRefCounter> {
        &self.counter
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Declaration
    // ─────────────────────────────────────────────────────────────────────────

    /// Start declaring an entity type bound to this session.
    pub fn define(&self, name: impl Into<String>) -> EntityTypeBuilder {
        let mut builder = EntityTypeBuilder::new(name, Arc::clone(&self.counter));
        builder.partition(self.config.default_partition.clone());
        builder
    }

    /// Schema facts for several types, concatenated in order.
    pub fn schema(&self, types: &[&EntityType]) -> Vec<Value> {
        types.iter().flat_map(|ty| ty.schema()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    /// Transaction data for the changes of several entities, concatenated.
    pub fn transaction(&self, entities: &[&Entity]) -> Result<Vec<Fact>> {
        let mut facts = Vec::new();
        for entity in entities {
            facts.extend(entity.tx_data()?);
        }
        tracing::debug!(entities = entities.len(), facts = facts.len(), "assembled transaction");
        Ok(facts)
    }

    /// Retraction facts for several persisted entities.
    pub fn retract(&self, entities: &[&Entity]) -> Result<Vec<Fact>> {
        let mut facts = Vec::with_capacity(entities.len());
        for entity in entities {
            facts.push(entity.destroy()?);
        }
        Ok(facts)
    }

    /// Apply the temporary-reference to permanent-id mapping reported by
    /// the store after a transaction.
    ///
    /// Entities whose minted reference appears in `assigned` are marked
    /// persisted with the permanent id. Returns how many were resolved.
    pub fn resolve_tempids(
        &self,
        entities: &mut [&mut Entity],
        assigned: &HashMap<i64, EntityId>,
    ) -> usize {
        let mut resolved = 0;
        for entity in entities.iter_mut() {
            if entity.is_persisted() {
                continue;
            }
            let id = entity
                .minted_reference()
                .and_then(|reference| assigned.get(&reference).copied());
            if let Some(id) = id {
                entity.mark_persisted(id);
                resolved += 1;
            }
        }
        if resolved < entities.len() {
            tracing::warn!(
                resolved,
                total = entities.len(),
                "some entities were not assigned permanent ids"
            );
        }
        resolved
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factmodel_entity::EntityTypeExt;
    use factmodel_schema::{AttributeOptions, ValueType};

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.default_partition, partition::user());
        assert_eq!(config.temp_ref_start, -1000);
    }

    #[test]
    fn test_config_from_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "default_partition": ":db.part/app" }"#).unwrap();
        assert_eq!(config.default_partition, Keyword::namespaced("db.part", "app"));
        assert_eq!(config.temp_ref_start, -1000);
    }

    #[test]
    fn test_types_share_counter() {
        let session = Session::new(SessionConfig {
            temp_ref_start: -2000,
            ..SessionConfig::default()
        });

        let cat = session.define("Cat").build().unwrap();
        let dog = session.define("Dog").build().unwrap();

        let c = cat.create(Vec::<(&str, Value)>::new()).unwrap();
        let d = dog.create(Vec::<(&str, Value)>::new()).unwrap();
        assert_eq!(c.temporary_reference(), -2000);
        assert_eq!(d.temporary_reference(), -2001);
    }

    #[test]
    fn test_define_uses_configured_partition() {
        let session = Session::new(SessionConfig {
            default_partition: Keyword::namespaced("db.part", "app"),
            ..SessionConfig::default()
        });
        let ty = session.define("Cat").build().unwrap();
        assert_eq!(ty.partition(), &Keyword::namespaced("db.part", "app"));
    }

    #[test]
    fn test_resolve_tempids() {
        let session = Session::default();
        let mut builder = session.define("Cat");
        builder
            .attribute("name", ValueType::String, AttributeOptions::new())
            .unwrap();
        let cat = builder.build().unwrap();

        let mut tom = cat.create(Vec::<(&str, Value)>::new()).unwrap();
        tom.set("name", "Tom").unwrap();
        let mut felix = cat.create(Vec::<(&str, Value)>::new()).unwrap();
        felix.set("name", "Felix").unwrap();

        let facts = session.transaction(&[&tom, &felix]).unwrap();
        assert_eq!(facts.len(), 2);

        let assigned = HashMap::from([(tom.temporary_reference(), EntityId(100))]);
        let resolved = session.resolve_tempids(&mut [&mut tom, &mut felix], &assigned);

        assert_eq!(resolved, 1);
        assert_eq!(tom.id(), Some(EntityId(100)));
        assert!(!tom.is_changed());
        assert!(felix.is_new_record());
    }
}
