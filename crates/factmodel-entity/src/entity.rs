//! Entity instances: current values, dirty tracking and identity.
//!
//! An [`Entity`] holds the current value of each attribute and, for every
//! attribute mutated since construction (or since the last reconcile), the
//! value it had before the first mutation. Transaction data is derived
//! from the difference between the two; see [`crate::tx`].

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use factmodel_core::{EntityId, EntityRef, TempId, Value};
use factmodel_schema::{AttributeSpec, EntityType};

use crate::error::{EntityError, Result};
use crate::validation::Errors;

/// One logical record of an [`EntityType`].
#[derive(Debug, Clone)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    id: Option<EntityId>,
    temp_ref: OnceLock<i64>,
    values: BTreeMap<String, Value>,
    /// Value before the first mutation, `Nil` if the attribute was unset.
    previous: BTreeMap<String, Value>,
    pub(crate) errors: Errors,
}

impl Entity {
    /// Construct an instance from `initial` merged over the type defaults.
    ///
    /// Explicit values win over defaults. Cardinality-many values are
    /// coerced to sets. Construction does not mark anything dirty.
    pub fn new<K, V, I>(entity_type: &Arc<EntityType>, initial: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut merged = entity_type.defaults().clone();
        for (name, value) in initial {
            merged.insert(name.into(), value.into());
        }

        let mut entity = Self::blank(entity_type);
        for (name, value) in merged {
            entity.write(&name, value)?;
        }
        Ok(entity)
    }

    /// Construct an instance with only the type defaults.
    pub fn with_defaults(entity_type: &Arc<EntityType>) -> Result<Self> {
        Self::new(entity_type, std::iter::empty::<(String, Value)>())
    }

    /// Re-hydrate an instance from a query row `[id, v1, .., vN]`.
    ///
    /// Values align positionally with the declared attribute order. The
    /// result is persisted and clean.
    pub fn from_query<I>(entity_type: &Arc<EntityType>, row: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut row = row.into_iter();
        let id = match row.next() {
            Some(Value::Integer(id)) => EntityId(id),
            Some(other) => {
                return Err(EntityError::InvalidEntityId(format!(
                    "expected integer, found {}",
                    other.type_name()
                )))
            }
            None => return Err(EntityError::InvalidEntityId("empty row".into())),
        };

        let values: Vec<Value> = row.collect();
        if values.len() != entity_type.len() {
            tracing::warn!(
                entity = %entity_type.name(),
                expected = entity_type.len(),
                got = values.len(),
                "query row arity mismatch"
            );
            return Err(EntityError::ArityMismatch {
                expected: entity_type.len(),
                got: values.len(),
            });
        }

        let mut entity = Self::blank(entity_type);
        entity.id = Some(id);
        for (spec, value) in entity_type.attributes().iter().zip(values) {
            entity.set(&spec.name, value)?;
        }
        entity.previous.clear();
        Ok(entity)
    }

    fn blank(entity_type: &Arc<EntityType>) -> Self {
        Self {
            entity_type: Arc::clone(entity_type),
            id: None,
            temp_ref: OnceLock::new(),
            values: BTreeMap::new(),
            previous: BTreeMap::new(),
            errors: Errors::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// The type this instance belongs to.
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub(crate) fn spec(&self, name: &str) -> Result<&AttributeSpec> {
        self.entity_type
            .attribute(name)
            .ok_or_else(|| EntityError::UnknownAttribute {
                entity: self.entity_type.name().to_string(),
                attribute: name.to_string(),
            })
    }

    /// Current value of an attribute, `None` if unset or undeclared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Current value of an attribute converted to `T`.
    pub fn get_as<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: for<'a> TryFrom<&'a Value, Error = factmodel_core::CoreError>,
    {
        self.spec(name)?;
        match self.values.get(name) {
            Some(value) => Ok(Some(T::try_from(value)?)),
            None => Ok(None),
        }
    }

    /// All set attribute values keyed by name.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Assign an attribute.
    ///
    /// The first assignment that changes the value records the prior value
    /// as the attribute's previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = self.coerce(name, value.into())?;
        let current = self.values.get(name).cloned().unwrap_or(Value::Nil);

        if current != value && !self.previous.contains_key(name) {
            self.previous.insert(name.to_string(), current);
        }
        self.store(name, value);
        Ok(())
    }

    /// Assign several attributes through [`set`](Self::set).
    pub fn update<K, V, I>(&mut self, values: I) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in values {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Assign without dirty tracking.
    fn write(&mut self, name: &str, value: Value) -> Result<()> {
        let value = self.coerce(name, value)?;
        self.store(name, value);
        Ok(())
    }

    fn coerce(&self, name: &str, value: Value) -> Result<Value> {
        if self.spec(name)?.is_many() {
            Ok(Value::Set(value.into_set()))
        } else {
            Ok(value)
        }
    }

    fn store(&mut self, name: &str, value: Value) {
        if value.is_nil() {
            self.values.remove(name);
        } else {
            self.values.insert(name.to_string(), value);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dirty state
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if any attribute changed since construction or reconcile.
    pub fn is_changed(&self) -> bool {
        !self.previous.is_empty()
    }

    /// Names of changed attributes, in declaration order.
    pub fn changed_attributes(&self) -> Vec<&str> {
        self.entity_type
            .attribute_names()
            .filter(|name| self.previous.contains_key(*name))
            .collect()
    }

    /// Value an attribute had before its first mutation.
    ///
    /// `None` if the attribute is not dirty; `Some(Nil)` if it was unset.
    pub fn changed_from(&self, name: &str) -> Option<&Value> {
        self.previous.get(name)
    }

    /// Forget all recorded changes.
    pub fn reset_changes(&mut self) {
        self.previous.clear();
    }

    /// Record the id the store assigned and treat the current state as saved.
    pub fn mark_persisted(&mut self, id: EntityId) {
        tracing::debug!(entity = %self.entity_type.name(), id = %id, "entity persisted");
        self.id = Some(id);
        self.previous.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// The permanent id, if the entity has been persisted.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    /// This instance's temporary reference, minted on first use.
    pub fn temporary_reference(&self) -> i64 {
        *self.temp_ref.get_or_init(|| {
            let reference = self.entity_type.counter().next();
            tracing::debug!(entity = %self.entity_type.name(), reference, "minted temporary reference");
            reference
        })
    }

    /// The temporary reference if one has been minted.
    pub fn minted_reference(&self) -> Option<i64> {
        self.temp_ref.get().copied()
    }

    /// Temporary id in the type's partition.
    pub fn temporary_id(&self) -> TempId {
        TempId::new(self.entity_type.partition().clone(), self.temporary_reference())
    }

    /// The permanent id if persisted, otherwise the temporary id.
    pub fn entity_ref(&self) -> EntityRef {
        match self.id {
            Some(id) => EntityRef::Id(id),
            None => EntityRef::Temp(self.temporary_id()),
        }
    }

    /// Stricter comparison than `==`: same entity, same type, and equal
    /// values for every declared attribute.
    pub fn eql(&self, other: &Entity) -> bool {
        self == other
            && Arc::ptr_eq(&self.entity_type, &other.entity_type)
            && self
                .entity_type
                .attribute_names()
                .all(|name| self.get(name) == other.get(name))
    }
}

/// Two entities are the same entity iff both are persisted with equal ids.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Construction and re-hydration as methods on the type.
pub trait EntityTypeExt {
    /// See [`Entity::new`].
    fn create<K, V, I>(&self, initial: I) -> Result<Entity>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>;

    /// See [`Entity::from_query`].
    fn from_query<I>(&self, row: I) -> Result<Entity>
    where
        I: IntoIterator<Item = Value>;
}

impl EntityTypeExt for Arc<EntityType> {
    fn create<K, V, I>(&self, initial: I) -> Result<Entity>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Entity::new(self, initial)
    }

    fn from_query<I>(&self, row: I) -> Result<Entity>
    where
        I: IntoIterator<Item = Value>,
    {
        Entity::from_query(self, row)
    }
}
