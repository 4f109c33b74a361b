//! Entity identity: permanent ids, temporary ids and the counter that mints
//! temporary references.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::keyword::Keyword;

/// Reference number used by every schema fact's temporary id.
pub const SCHEMA_TEMP_REF: i64 = -1;

/// Well-known partitions.
pub mod partition {
    use crate::keyword::Keyword;

    /// Partition holding schema (attribute) entities.
    pub fn db() -> Keyword {
        Keyword::namespaced("db.part", "db")
    }

    /// Default partition for user entities.
    pub fn user() -> Keyword {
        Keyword::namespaced("db.part", "user")
    }
}

/// A permanent, store-assigned entity id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Get the raw id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A partition-scoped placeholder for an entity the store has not yet seen.
///
/// The store mints a permanent id for each distinct temporary id in a
/// transaction and reports the mapping back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TempId {
    /// Partition the new entity will live in.
    pub partition: Keyword,
    /// Negative reference number, unique per process.
    pub reference: i64,
}

impl TempId {
    /// Create a temporary id.
    pub fn new(partition: Keyword, reference: i64) -> Self {
        Self {
            partition,
            reference,
        }
    }

    /// The temporary id shared by all schema facts.
    pub fn schema() -> Self {
        Self::new(partition::db(), SCHEMA_TEMP_REF)
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#db/id [{} {}]", self.partition, self.reference)
    }
}

/// Serialized as the tagged element `{"#db/id": [partition, reference]}`.
impl Serialize for TempId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("#db/id", &(&self.partition, self.reference))?;
        map.end()
    }
}

/// Either a permanent id or a temporary id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    Id(EntityId),
    Temp(TempId),
}

impl EntityRef {
    /// Check if this refers to a persisted entity.
    pub fn is_permanent(&self) -> bool {
        matches!(self, EntityRef::Id(_))
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Id(id) => write!(f, "{}", id),
            EntityRef::Temp(tmp) => write!(f, "{}", tmp),
        }
    }
}

impl Serialize for EntityRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityRef::Id(id) => id.serialize(serializer),
            EntityRef::Temp(tmp) => tmp.serialize(serializer),
        }
    }
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        EntityRef::Id(id)
    }
}

impl From<TempId> for EntityRef {
    fn from(tmp: TempId) -> Self {
        EntityRef::Temp(tmp)
    }
}

/// Mints temporary reference numbers.
///
/// Each call to [`next`](Self::next) hands out the current value and moves
/// one lower, atomically, so instances created on different threads never
/// share a reference.
#[derive(Debug)]
pub struct TempRefCounter {
    next: AtomicI64,
}

impl TempRefCounter {
    /// First reference handed out by a default counter.
    pub const DEFAULT_START: i64 = -1000;

    /// Create a counter starting at [`DEFAULT_START`](Self::DEFAULT_START).
    pub fn new() -> Self {
        Self::starting_at(Self::DEFAULT_START)
    }

    /// Create a counter whose first reference is `start`.
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Take the next reference.
    pub fn next(&self) -> i64 {
        self.next.fetch_sub(1, Ordering::Relaxed)
    }

    /// The reference the next call to `next` will return.
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for TempRefCounter {
    fn default() -> Self {
        Self::new()
    }
}
