//! Entity types: the per-type attribute registry.
//!
//! An [`EntityType`] is built once through [`EntityTypeBuilder`] and is
//! immutable afterwards, so it can be shared behind an `Arc` by every
//! instance of the type.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use factmodel_core::{derive_prefix, namespace, partition, Keyword, TempRefCounter, Value};

use crate::attribute::{AttributeOptions, AttributeSpec, ValueType};
use crate::error::{Result, SchemaError};

/// The declared shape of one kind of entity.
#[derive(Debug)]
pub struct EntityType {
    name: String,
    prefix: String,
    partition: Keyword,
    /// Declaration order, which is also the re-hydration order.
    attributes: Vec<AttributeSpec>,
    positions: HashMap<String, usize>,
    defaults: BTreeMap<String, Value>,
    counter: Arc<TempRefCounter>,
}

impl EntityType {
    /// Start declaring a type with its own temporary-reference counter.
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder::new(name, Arc::new(TempRefCounter::new()))
    }

    /// The type name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix of every attribute ident.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Partition new instances are created in.
    pub fn partition(&self) -> &Keyword {
        &self.partition
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.positions.get(name).map(|&i| &self.attributes[i])
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// Attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Declaration position of an attribute.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Defaults keyed by attribute name.
    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.defaults
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The namespaced ident of an attribute, `:<prefix>/<name>`.
    pub fn ident(&self, attribute: &str) -> Keyword {
        namespace(&self.prefix, attribute)
    }

    /// The counter temporary references are minted from.
    pub fn counter(&self) -> &Arc<TempRefCounter> {
        &self.counter
    }
}

/// Builder for an [`EntityType`].
#[derive(Debug)]
pub struct EntityTypeBuilder {
    name: String,
    prefix: Option<String>,
    partition: Keyword,
    attributes: Vec<AttributeSpec>,
    positions: HashMap<String, usize>,
    counter: Arc<TempRefCounter>,
}

impl EntityTypeBuilder {
    /// Start declaring a type that mints temporary ids from `counter`.
    pub fn new(name: impl Into<String>, counter: Arc<TempRefCounter>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            partition: partition::user(),
            attributes: Vec::new(),
            positions: HashMap::new(),
            counter,
        }
    }

    /// Override the derived namespace prefix.
    pub fn namespace_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Override the default `:db.part/user` partition.
    pub fn partition(&mut self, partition: Keyword) -> &mut Self {
        self.partition = partition;
        self
    }

    /// Declare an attribute.
    pub fn attribute(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
        options: AttributeOptions,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.positions.contains_key(&name) {
            tracing::warn!(entity = %self.name, attribute = %name, "duplicate attribute declaration");
            return Err(SchemaError::DuplicateAttribute {
                entity: self.name.clone(),
                attribute: name,
            });
        }

        let spec = AttributeSpec::new(name.clone(), value_type, options);
        tracing::debug!(
            entity = %self.name,
            attribute = %name,
            value_type = %value_type,
            cardinality = ?spec.cardinality,
            "declared attribute"
        );

        self.positions.insert(name, self.attributes.len());
        self.attributes.push(spec);
        Ok(self)
    }

    /// Declare an attribute from a semantic type tag such as `"string"`.
    pub fn attribute_tagged(
        &mut self,
        name: impl Into<String>,
        type_tag: &str,
        options: AttributeOptions,
    ) -> Result<&mut Self> {
        let value_type = type_tag.parse::<ValueType>()?;
        self.attribute(name, value_type, options)
    }

    /// Finish the declaration.
    pub fn build(self) -> Result<Arc<EntityType>> {
        let prefix = match self.prefix {
            Some(prefix) => prefix,
            None => derive_prefix(&self.name),
        };
        if prefix.is_empty() || prefix.contains('/') {
            return Err(SchemaError::InvalidPrefix(prefix));
        }

        let defaults = self
            .attributes
            .iter()
            .filter_map(|a| a.default.clone().map(|d| (a.name.clone(), d)))
            .collect();

        tracing::debug!(
            entity = %self.name,
            prefix = %prefix,
            attributes = self.attributes.len(),
            "built entity type"
        );

        Ok(Arc::new(EntityType {
            name: self.name,
            prefix,
            partition: self.partition,
            attributes: self.attributes,
            positions: self.positions,
            defaults,
            counter: self.counter,
        }))
    }
}
