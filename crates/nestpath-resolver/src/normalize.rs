//! Normalization, deep serialization and flattening of resolved values.

use nestpath_core::{Map, Value};

use crate::traverse::KEY_SEPARATOR;

/// Shallow structural conversion.
///
/// Records become mappings of their fields, enumeration members become their
/// name and a list of records becomes a list of mappings. Values nested
/// deeper are left untouched.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Record(fields) => Value::Map(fields.into_map()),
        Value::Enum(member) => Value::String(member.name),
        Value::List(items) if items.first().is_some_and(Value::is_record) => Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Record(fields) => Value::Map(fields.into_map()),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Deep conversion into plain values: mappings, lists, strings, numbers,
/// booleans and null.
///
/// Attribute-bag objects become mappings of their attributes; opaque values
/// become their textual representation.
pub fn serialize(value: Value) -> Value {
    match value {
        Value::Enum(member) => Value::String(member.name),
        Value::Record(fields) | Value::Object(fields) => serialize_map(fields.into_map()),
        Value::Map(map) => serialize_map(map),
        Value::List(items) => Value::List(items.into_iter().map(serialize).collect()),
        Value::Opaque(repr) => Value::String(repr),
        scalar => scalar,
    }
}

fn serialize_map(map: Map) -> Value {
    Value::Map(map.into_iter().map(|(k, v)| (k, serialize(v))).collect())
}

/// Collapse each mapping or record result into single-level entries keyed by
/// `{result_key}_{field}_{nested_field}...`. Other results are kept as-is.
///
/// Returns `None` if nothing is left (e.g. every result was an empty mapping).
pub fn flatten(results: Map) -> Option<Map> {
    let mut flat = Map::new();
    for (key, value) in results {
        match value {
            Value::Map(_) | Value::Record(_) => {
                let mut prefix = vec![key];
                flatten_into(&mut flat, &value, &mut prefix);
            }
            other => {
                flat.insert(key, other);
            }
        }
    }
    (!flat.is_empty()).then_some(flat)
}

fn flatten_into(flat: &mut Map, value: &Value, prefix: &mut Vec<String>) {
    let entries = match value {
        Value::Map(map) => map,
        Value::Record(fields) => fields.as_map(),
        _ => return,
    };

    for (key, child) in entries {
        prefix.push(key.clone());
        match child {
            Value::Map(_) | Value::Record(_) => flatten_into(flat, child, prefix),
            Value::Enum(member) => {
                flat.insert(prefix.join(KEY_SEPARATOR), Value::String(member.name.clone()));
            }
            leaf => {
                flat.insert(prefix.join(KEY_SEPARATOR), leaf.clone());
            }
        }
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestpath_core::Fields;
    use serde_json::json;

    fn bowl(id: i64) -> Value {
        Value::record(
            Fields::new("Bowl")
                .with_field("id", id)
                .with_field("food_type", Value::enum_member("FoodType", "WET")),
        )
    }

    #[test]
    fn test_normalize_is_shallow() {
        let normalized = normalize(Value::record(
            Fields::new("Outer").with_field("inner", bowl(1)),
        ));
        let map = normalized.as_map().unwrap();
        assert!(map["inner"].is_record());
    }

    #[test]
    fn test_normalize_list_of_records() {
        let normalized = normalize(Value::List(vec![bowl(1), bowl(2)]));
        let items = normalized.as_list().unwrap();
        assert!(items.iter().all(|item| item.as_map().is_some()));
        // enum fields are left for serialize
        assert_eq!(items[0].get("food_type").and_then(Value::enum_name), Some("WET"));
    }

    #[test]
    fn test_normalize_enum_and_passthrough() {
        assert_eq!(normalize(Value::enum_member("Color", "GREEN")), Value::from("GREEN"));
        assert_eq!(normalize(Value::from(3)), Value::from(3));
        assert_eq!(normalize(Value::from(vec![1, 2])), Value::from(vec![1, 2]));
    }

    #[test]
    fn test_serialize_is_deep() {
        let value = Value::object(
            Fields::new("Device")
                .with_field("bowls", Value::List(vec![bowl(1)]))
                .with_field("socket", Value::opaque("<socket fd=3>")),
        );
        assert_eq!(
            serialize(value).to_json(),
            json!({
                "bowls": [{"id": 1, "food_type": "WET"}],
                "socket": "<socket fd=3>"
            })
        );
    }

    #[test]
    fn test_flatten_nested() {
        let mut results = Map::new();
        results.insert("a_b".into(), Value::from(json!({"c": 1, "d": {"e": 2}})));
        results.insert("n".into(), Value::from(5));
        let flat = flatten(results).unwrap();
        assert_eq!(
            Value::Map(flat).to_json(),
            json!({"a_b_c": 1, "a_b_d_e": 2, "n": 5})
        );
    }

    #[test]
    fn test_flatten_record_with_enum_leaf() {
        let mut results = Map::new();
        results.insert("bowl".into(), bowl(7));
        let flat = flatten(results).unwrap();
        assert_eq!(flat.get("bowl_food_type"), Some(&Value::from("WET")));
        assert_eq!(flat.get("bowl_id"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_flatten_empty_is_none() {
        let mut results = Map::new();
        results.insert("a".into(), Value::Map(Map::new()));
        assert_eq!(flatten(results), None);
    }
}
