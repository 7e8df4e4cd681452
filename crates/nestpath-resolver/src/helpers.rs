//! Single-path lookup and small value utilities.
//!
//! These use the bracket index form (`control.bowls.settings[1].target`)
//! instead of the resolver's dotted indices and wildcards: one path in, one
//! value out.

use nestpath_core::{Map, Value};
use tracing::{trace, warn};

use crate::traverse::resolve_offset;

/// Largest `[index]` that [`build_nested`] will pad a list out to.
pub const MAX_BUILD_INDEX: usize = 4096;

/// Split `name[3]` into `("name", 3)`.
fn split_index(part: &str) -> Option<(&str, usize)> {
    let inner = part.strip_suffix(']')?;
    let (key, digits) = inner.split_once('[')?;
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    if key.is_empty() || !key.chars().all(is_word) {
        return None;
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((key, digits.parse().ok()?))
}

/// Look up a dotted path with optional `[index]` suffixes.
///
/// Works across mappings, records and objects. Any missing key, missing
/// field or bad index gives `None`.
pub fn get_by_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in path.split('.') {
        if current.is_null() {
            return None;
        }
        current = match split_index(part) {
            Some((key, index)) => current.get(key)?.as_list()?.get(index)?,
            None => current.get(part)?,
        };
    }
    Some(current)
}

/// [`get_by_path`] for several output keys; misses are [`Value::Null`].
pub fn get_many<K: AsRef<str>, P: AsRef<str>>(root: &Value, paths: &[(K, P)]) -> Map {
    paths
        .iter()
        .map(|(key, path)| {
            let value = get_by_path(root, path.as_ref()).cloned().unwrap_or_default();
            (key.as_ref().to_string(), value)
        })
        .collect()
}

/// Build the nested mapping that places `value` at `path`.
///
/// `name[i]` segments produce a list of length `i + 1` padded with nulls, so
/// `build_nested("bowls.settings[1].target", 50)` gives
/// `{"bowls": {"settings": [null, {"target": 50}]}}`.
///
/// Returns `None` if an index exceeds [`MAX_BUILD_INDEX`].
pub fn build_nested(path: &str, value: impl Into<Value>) -> Option<Value> {
    let mut result = value.into();
    for part in path.split('.').rev() {
        let mut map = Map::new();
        match split_index(part) {
            Some((key, index)) => {
                if index > MAX_BUILD_INDEX {
                    warn!(
                        "Index {} in '{}' exceeds the limit of {}",
                        index, path, MAX_BUILD_INDEX
                    );
                    return None;
                }
                let mut items = vec![Value::Null; index + 1];
                items[index] = result;
                map.insert(key.to_string(), Value::List(items));
            }
            None => {
                map.insert(part.to_string(), result);
            }
        }
        result = Value::Map(map);
    }
    trace!("Built nested value for '{}'", path);
    Some(result)
}

/// Non-null entries of a list, values of a mapping/record/object, or the
/// value itself. Null gives an empty list.
pub fn ensure_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::List(items) => items.iter().filter(|v| !v.is_null()).collect(),
        Value::Map(map) => map.values().filter(|v| !v.is_null()).collect(),
        Value::Record(fields) | Value::Object(fields) => {
            fields.as_map().values().filter(|v| !v.is_null()).collect()
        }
        other => vec![other],
    }
}

/// `items[index].field`, with negative indices counting from the end.
/// Without a field, the item itself.
pub fn index_field<'a>(items: &'a [Value], index: i64, field: Option<&str>) -> Option<&'a Value> {
    let item = items.get(resolve_offset(index, items.len())?)?;
    match field {
        Some(field) => item.get(field),
        None => Some(item),
    }
}

/// Sum of the numeric `field` across `items`, skipping missing or
/// non-numeric values.
pub fn sum_field(items: &[Value], field: &str) -> f64 {
    items
        .iter()
        .filter_map(|item| item.get(field))
        .filter_map(|value| match value {
            Value::Int(_) | Value::Float(_) => value.as_f64(),
            _ => None,
        })
        .sum()
}
