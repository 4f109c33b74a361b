//! Plain data values exchanged with the serialization layer.
//!
//! Attribute values, schema facts and transaction facts are all expressed
//! as [`Value`]s: scalars, vectors, sets and keyword-keyed maps, plus the
//! tagged [`TempId`] marker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use url::Url;

use crate::error::CoreError;
use crate::keyword::Keyword;
use crate::types::{EntityId, EntityRef, TempId};

/// A single datum.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Keyword(Keyword),
    String(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    Uri(Url),
    TempId(TempId),
    Vector(Vec<Value>),
    Set(ValueSet),
    Map(BTreeMap<Keyword, Value>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Keyword(_) => "keyword",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Timestamp(_) => "timestamp",
            Value::Uri(_) => "uri",
            Value::TempId(_) => "tempid",
            Value::Vector(_) => "vector",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<Keyword, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Coerce into a set.
    ///
    /// Sets pass through, vectors become the set of their elements, nil
    /// becomes the empty set and any other value a singleton.
    pub fn into_set(self) -> ValueSet {
        match self {
            Value::Set(set) => set,
            Value::Vector(items) => items.into_iter().collect(),
            Value::Nil => ValueSet::new(),
            other => std::iter::once(other).collect(),
        }
    }

    /// Position of the variant in the total order.
    fn rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Boolean(_) => 1,
            Value::Keyword(_) => 2,
            Value::String(_) => 3,
            Value::Integer(_) => 4,
            Value::Float(_) => 5,
            Value::Decimal(_) => 6,
            Value::Timestamp(_) => 7,
            Value::Uri(_) => 8,
            Value::TempId(_) => 9,
            Value::Vector(_) => 10,
            Value::Set(_) => 11,
            Value::Map(_) => 12,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Uri(a), Value::Uri(b)) => a.cmp(b),
            (Value::TempId(a), Value::TempId(b)) => a.cmp(b),
            (Value::Vector(a), Value::Vector(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Nil => {}
            Value::Boolean(b) => b.hash(state),
            Value::Keyword(k) => k.hash(state),
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Decimal(d) => d.hash(state),
            Value::Timestamp(t) => t.hash(state),
            Value::Uri(u) => u.hash(state),
            Value::TempId(t) => t.hash(state),
            Value::Vector(v) => v.hash(state),
            Value::Set(s) => s.hash(state),
            Value::Map(m) => m.hash(state),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Keyword(k) => k.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::Timestamp(t) => Serialize::serialize(t, serializer),
            Value::Uri(u) => Serialize::serialize(u, serializer),
            Value::TempId(t) => t.serialize(serializer),
            Value::Vector(v) => v.serialize(serializer),
            Value::Set(s) => s.serialize(serializer),
            Value::Map(m) => m.serialize(serializer),
        }
    }
}

/// An ordered set of values, used for cardinality-many attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ValueSet(BTreeSet<Value>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        self.0.insert(value.into())
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Value> {
        self.0.iter()
    }

    /// Values in `self` that are not in `other`.
    pub fn difference(&self, other: &ValueSet) -> ValueSet {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Values in either set.
    pub fn union(&self, other: &ValueSet) -> ValueSet {
        self.0.union(&other.0).cloned().collect()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = btree_set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = btree_set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeSet<Value>> for ValueSet {
    fn from(set: BTreeSet<Value>) -> Self {
        Self(set)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions into Value
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Boolean,
    Keyword => Keyword,
    String => String,
    &str => String,
    i64 => Integer,
    i32 => Integer,
    f64 => Float,
    Decimal => Decimal,
    DateTime<Utc> => Timestamp,
    Url => Uri,
    TempId => TempId,
    ValueSet => Set,
    Vec<Value> => Vector,
    BTreeMap<Keyword, Value> => Map,
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Integer(id.0)
    }
}

impl From<EntityRef> for Value {
    fn from(r: EntityRef) -> Self {
        match r {
            EntityRef::Id(id) => id.into(),
            EntityRef::Temp(tmp) => Value::TempId(tmp),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions out of Value
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_try_from_value {
    ($($ty:ty => $variant:ident as $expected:literal),* $(,)?) => {
        $(
            impl TryFrom<&Value> for $ty {
                type Error = CoreError;

                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(CoreError::TypeMismatch {
                            expected: $expected,
                            found: other.type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_try_from_value! {
    bool => Boolean as "boolean",
    Keyword => Keyword as "keyword",
    String => String as "string",
    i64 => Integer as "integer",
    f64 => Float as "float",
    Decimal => Decimal as "decimal",
    DateTime<Utc> => Timestamp as "timestamp",
    Url => Uri as "uri",
    ValueSet => Set as "set",
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(name: &str) -> Value {
        Value::Keyword(Keyword::new(name))
    }

    #[test]
    fn test_into_set_coercion() {
        let from_vec = Value::Vector(vec![kw("fast"), kw("fast"), kw("sneaky")]).into_set();
        assert_eq!(from_vec.len(), 2);

        let from_scalar = kw("fast").into_set();
        assert_eq!(from_scalar.len(), 1);
        assert!(from_scalar.contains(&kw("fast")));

        assert!(Value::Nil.into_set().is_empty());

        let set: ValueSet = [kw("a")].into_iter().collect();
        assert_eq!(Value::Set(set.clone()).into_set(), set);
    }

    #[test]
    fn test_set_difference() {
        let prev: ValueSet = [kw("a"), kw("b")].into_iter().collect();
        let cur: ValueSet = [kw("b"), kw("c")].into_iter().collect();

        assert_eq!(prev.difference(&cur), [kw("a")].into_iter().collect::<ValueSet>());
        assert_eq!(cur.difference(&prev), [kw("c")].into_iter().collect::<ValueSet>());
        assert_eq!(prev.union(&cur).len(), 3);
    }

    #[test]
    fn test_float_ordering_is_total() {
        let mut set = ValueSet::new();
        set.insert(f64::NAN);
        set.insert(f64::NAN);
        set.insert(1.5);
        assert_eq!(set.len(), 2);
        assert_eq!(Value::Float(2.0), Value::Float(2.0));
    }

    #[test]
    fn test_cross_variant_values_differ() {
        assert_ne!(Value::from("1"), Value::from(1i64));
        assert!(Value::Nil < Value::from(false));
    }

    #[test]
    fn test_try_from_value() {
        let v = Value::from("Jerry");
        assert_eq!(String::try_from(&v).unwrap(), "Jerry");

        let err = i64::try_from(&v).unwrap_err();
        assert_eq!(
            err,
            CoreError::TypeMismatch {
                expected: "integer",
                found: "string"
            }
        );
    }

    #[test]
    fn test_option_into_value() {
        assert!(Value::from(None::<i64>).is_nil());
        assert_eq!(Value::from(Some(3i64)), Value::Integer(3));
    }

    #[test]
    fn test_value_serializes_as_plain_data() {
        let mut map = BTreeMap::new();
        map.insert(Keyword::namespaced("mouse", "name"), Value::from("Jerry"));
        map.insert(
            Keyword::namespaced("mouse", "tags"),
            Value::Set([kw("fast")].into_iter().collect()),
        );

        let json = serde_json::to_value(Value::Map(map)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ ":mouse/name": "Jerry", ":mouse/tags": [":fast"] })
        );
    }

    #[test]
    fn test_typed_scalars_serialize() {
        let balance: Decimal = "1024.50".parse().unwrap();
        let joined: DateTime<Utc> = "2024-03-01T12:00:00Z".parse().unwrap();
        let homepage: Url = "https://example.com/jerry".parse().unwrap();

        let json = serde_json::to_value(Value::Vector(vec![
            balance.into(),
            joined.into(),
            homepage.into(),
        ]))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!(["1024.50", "2024-03-01T12:00:00Z", "https://example.com/jerry"])
        );
    }
}
