//! Path specifications and result assembly.

use indexmap::IndexMap;
use nestpath_core::{Error, Map, Result, Value};
use tracing::{debug, warn};

use crate::path::PathCache;
use crate::traverse::Traversal;

/// What to extract: a bare path, or output keys mapped to paths.
///
/// A bare path behaves like a one-entry mapping with an empty output key, so
/// the traversal-derived key names the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    Single(String),
    Mapping(Vec<(String, String)>),
}

impl PathSpec {
    /// `(output_key, path)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            PathSpec::Single(path) => vec![("", path.as_str())],
            PathSpec::Mapping(pairs) => pairs
                .iter()
                .map(|(key, path)| (key.as_str(), path.as_str()))
                .collect(),
        }
    }

    /// Build from a dynamic value: a string or a mapping of strings.
    ///
    /// Entries of a mapping whose path is not a string are skipped.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(PathSpec::Single(path.clone())),
            Value::Map(map) => Ok(PathSpec::Mapping(
                map.iter()
                    .filter_map(|(key, path)| string_entry(key, path.as_str()))
                    .collect(),
            )),
            other => Err(Error::InvalidPathSpec {
                found: other.type_name().to_string(),
            }),
        }
    }

    /// Build from a JSON value: a string or an object of strings.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match value {
            Json::String(path) => Ok(PathSpec::Single(path.clone())),
            Json::Object(obj) => Ok(PathSpec::Mapping(
                obj.iter()
                    .filter_map(|(key, path)| string_entry(key, path.as_str()))
                    .collect(),
            )),
            Json::Null => Err(invalid("null")),
            Json::Bool(_) => Err(invalid("bool")),
            Json::Number(_) => Err(invalid("number")),
            Json::Array(_) => Err(invalid("array")),
        }
    }
}

fn invalid(found: &str) -> Error {
    Error::InvalidPathSpec {
        found: found.to_string(),
    }
}

fn string_entry(key: &str, path: Option<&str>) -> Option<(String, String)> {
    match path {
        Some(path) => Some((key.to_string(), path.to_string())),
        None => {
            warn!("Skipping non-string path for output key '{}'", key);
            None
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        PathSpec::Single(path.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        PathSpec::Single(path)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for PathSpec {
    fn from(pairs: Vec<(K, V)>) -> Self {
        PathSpec::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PathSpec {
    fn from(pairs: [(K, V); N]) -> Self {
        PathSpec::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<IndexMap<String, String>> for PathSpec {
    fn from(map: IndexMap<String, String>) -> Self {
        PathSpec::Mapping(map.into_iter().collect())
    }
}

impl TryFrom<&Value> for PathSpec {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        PathSpec::from_value(value)
    }
}

impl TryFrom<&serde_json::Value> for PathSpec {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        PathSpec::from_json(value)
    }
}

/// Name a traversal match.
///
/// - empty output key: the traversal key as-is
/// - wildcard path whose traversal key already contains the output key: the
///   traversal key as-is
/// - other wildcard matches: `{output_key}_{joined_key}`
/// - literal paths: the output key
pub fn combined_key(output_key: &str, joined_key: &str, has_wildcard: bool) -> String {
    if output_key.is_empty() {
        return joined_key.to_string();
    }
    if has_wildcard && !joined_key.is_empty() {
        if joined_key.starts_with(output_key) || joined_key.contains(output_key) {
            return joined_key.to_string();
        }
        if joined_key != output_key {
            return format!("{}_{}", output_key, joined_key);
        }
    }
    output_key.to_string()
}

/// Run every path of `spec` against `root` and collect the matches.
///
/// Later matches with the same key overwrite earlier ones. Returns `None`
/// when no path matched anything.
pub fn assemble(root: &Value, spec: &PathSpec, cache: &PathCache) -> Option<Map> {
    let mut results = Map::new();
    let mut matched = false;

    for (output_key, raw_path) in spec.entries() {
        let path = cache.parse(raw_path);
        let mut count = 0usize;
        for (joined_key, value) in Traversal::new(root, path.segments()) {
            let key = combined_key(output_key, &joined_key, path.has_wildcard());
            results.insert(key, value.clone());
            count += 1;
        }
        if count == 0 {
            debug!("Path '{}' matched nothing", raw_path);
        }
        matched |= count > 0;
    }

    matched.then_some(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_combined_key_rules() {
        assert_eq!(combined_key("", "a_x", true), "a_x");
        assert_eq!(combined_key("a", "a_x", true), "a_x");
        assert_eq!(combined_key("x", "a_x", true), "a_x");
        assert_eq!(combined_key("out", "a_x", true), "out_a_x");
        assert_eq!(combined_key("out", "", true), "out");
        assert_eq!(combined_key("out", "a_b", false), "out");
    }

    #[test]
    fn test_single_path_uses_traversal_key() {
        let root = Value::from(json!({"a": {"b": 1}}));
        let results = assemble(&root, &PathSpec::from("a.b"), &PathCache::default()).unwrap();
        assert_eq!(results.get("a_b"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_last_write_wins_on_collision() {
        let root = Value::from(json!({"a": 1, "b": 2}));
        let spec = PathSpec::from([("same", "a"), ("same", "b")]);
        let results = assemble(&root, &spec, &PathCache::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("same"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_nothing_matched_is_none() {
        let root = Value::from(json!({"a": 1}));
        let spec = PathSpec::from([("x", "b"), ("y", "a.c")]);
        assert_eq!(assemble(&root, &spec, &PathCache::default()), None);
    }

    #[test]
    fn test_from_value_rejects_unsupported_types() {
        assert!(matches!(
            PathSpec::from_value(&Value::Int(123)),
            Err(Error::InvalidPathSpec { .. })
        ));
        assert!(matches!(
            PathSpec::from_json(&json!([1, 2])),
            Err(Error::InvalidPathSpec { .. })
        ));
    }

    #[test]
    fn test_from_json_skips_non_string_entries() {
        let spec = PathSpec::from_json(&json!({"": [], "a": "a.b"})).unwrap();
        assert_eq!(spec, PathSpec::Mapping(vec![("a".into(), "a.b".into())]));
    }
}
