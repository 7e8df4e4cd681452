//! Dynamic value model for caller-supplied object graphs.
//!
//! Every root handed to the resolver is expressed as a [`Value`]. The model
//! distinguishes plain mappings from record-like values (fixed, named fields)
//! and from attribute-bag objects, because normalization and serialization
//! treat them differently even though traversal does not.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Result;

/// Ordered string-keyed mapping. Iteration follows insertion order.
pub type Map = IndexMap<String, Value>;

/// A member of an enumeration, carried by its symbolic name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Name of the enumeration type (e.g. `FoodType`)
    pub type_name: String,
    /// Symbolic member name (e.g. `WET`)
    pub name: String,
    /// Underlying member value, if the enumeration carries one
    pub value: Option<Box<Value>>,
}

impl EnumMember {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(Box::new(value.into()));
        self
    }
}

/// Named, ordered fields of a record-like value or an attribute-bag object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    type_name: String,
    entries: Map,
}

impl Fields {
    /// Create an empty field set for the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: Map::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fields viewed as an equivalent mapping.
    pub fn as_map(&self) -> &Map {
        &self.entries
    }

    pub fn into_map(self) -> Map {
        self.entries
    }
}

/// A node of a heterogeneous object graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Enumeration member
    Enum(EnumMember),
    /// Ordered, integer-indexed sequence
    List(Vec<Value>),
    /// String-keyed mapping
    Map(Map),
    /// Record-like value with a fixed set of named fields
    Record(Fields),
    /// Object exposing an attribute bag that is not a record
    Object(Fields),
    /// Object with no attribute bag, kept as its textual representation
    Opaque(String),
}

/// How a value can be descended into, resolved once per value.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Key/value pairs
    Mapping(&'a Map),
    /// Integer-indexed elements
    Sequence(&'a [Value]),
    /// Named fields (records and attribute-bag objects)
    Record(&'a Fields),
    /// Nothing to descend into
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    /// Keyed view shared by mappings and field-bearing values.
    pub fn entries(&self) -> Option<&'a Map> {
        match *self {
            Shape::Mapping(map) => Some(map),
            Shape::Record(fields) => Some(fields.as_map()),
            Shape::Sequence(_) | Shape::Scalar(_) => None,
        }
    }
}

impl Value {
    /// Build a record-like value.
    pub fn record(fields: Fields) -> Self {
        Value::Record(fields)
    }

    /// Build an attribute-bag object.
    pub fn object(fields: Fields) -> Self {
        Value::Object(fields)
    }

    /// Build an enumeration member value.
    pub fn enum_member(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Enum(EnumMember::new(type_name, name))
    }

    /// Build an opaque value from its textual representation.
    pub fn opaque(repr: impl Into<String>) -> Self {
        Value::Opaque(repr.into())
    }

    /// Convert any serializable Rust value through its `serde_json` form.
    ///
    /// Structs and maps become [`Value::Map`]; unit enum variants become
    /// strings. Use the [`Record`](crate::record::Record) capability when the
    /// record/enumeration distinction matters.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    pub fn shape(&self) -> Shape<'_> {
        match self {
            Value::Map(map) => Shape::Mapping(map),
            Value::List(items) => Shape::Sequence(items),
            Value::Record(fields) | Value::Object(fields) => Shape::Record(fields),
            _ => Shape::Scalar(self),
        }
    }

    /// Null, empty string, empty mapping or empty sequence.
    pub fn is_empty_like(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Object(_) => "object",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Look up a key on a mapping or a field on a record/object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.shape().entries().and_then(|entries| entries.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Symbolic name of an enumeration member.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Value::Enum(member) => Some(&member.name),
            _ => None,
        }
    }

    /// Plain JSON form: enumerations as names, records and objects as maps,
    /// opaque values as their representation. Non-finite floats become null.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Enum(member) => Json::String(member.name.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Record(fields) | Value::Object(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Opaque(repr) => Json::String(repr.clone()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) | Value::Opaque(s) => serializer.serialize_str(s),
            Value::Enum(member) => serializer.serialize_str(&member.name),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => serialize_entries(serializer, map),
            Value::Record(fields) | Value::Object(fields) => {
                serialize_entries(serializer, fields.as_map())
            }
        }
    }
}

fn serialize_entries<S: Serializer>(
    serializer: S,
    map: &Map,
) -> std::result::Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, v)?;
    }
    out.end()
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(obj) => Value::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(v as f64),
        }
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<EnumMember> for Value {
    fn from(v: EnumMember) -> Self {
        Value::Enum(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
