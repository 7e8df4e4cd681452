//! Resolver facade: parse, traverse, assemble, then shape the result.

use nestpath_core::{Map, ResolveOptions, ResolverConfig, Result, Value};
use tracing::trace;

use crate::assemble::{assemble, PathSpec};
use crate::normalize::{flatten, normalize, serialize};
use crate::path::{CacheStats, PathCache};

/// Outcome of a successful resolve call.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Output key to value
    Map(Map),
    /// Single unwrapped value (`native` option)
    Native(Value),
}

impl Resolved {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Resolved::Map(map) => Some(map),
            Resolved::Native(_) => None,
        }
    }

    pub fn into_map(self) -> Option<Map> {
        match self {
            Resolved::Map(map) => Some(map),
            Resolved::Native(_) => None,
        }
    }

    /// The result as a single value; mappings become [`Value::Map`].
    pub fn into_value(self) -> Value {
        match self {
            Resolved::Map(map) => Value::Map(map),
            Resolved::Native(value) => value,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Resolved::Map(map) => Value::Map(map.clone()).to_json(),
            Resolved::Native(value) => value.to_json(),
        }
    }
}

/// Resolves path specifications against arbitrary value graphs.
///
/// Holds the parsed-path cache and default options; the input graph is
/// never modified and nothing else is kept between calls.
#[derive(Debug)]
pub struct PathResolver {
    cache: PathCache,
    options: ResolveOptions,
}

impl PathResolver {
    /// Resolver with default configuration.
    pub fn new() -> Self {
        Self {
            cache: PathCache::default(),
            options: ResolveOptions::default(),
        }
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: PathCache::new(config.cache_capacity),
            options: config.options,
        })
    }

    /// Default options used by [`resolve_with_defaults`](Self::resolve_with_defaults).
    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Extract the values named by `spec` from `root`.
    ///
    /// Returns `Ok(None)` when no path matched. Errors only for conflicting
    /// options.
    pub fn resolve(
        &self,
        root: &Value,
        spec: impl Into<PathSpec>,
        options: ResolveOptions,
    ) -> Result<Option<Resolved>> {
        options.validate()?;
        Ok(self.run(root, &spec.into(), options))
    }

    pub fn resolve_with_defaults(
        &self,
        root: &Value,
        spec: impl Into<PathSpec>,
    ) -> Result<Option<Resolved>> {
        self.resolve(root, spec, self.options)
    }

    /// Like [`resolve`](Self::resolve) with a dynamically typed specification,
    /// which must be a string or a mapping of strings.
    pub fn resolve_value(
        &self,
        root: &Value,
        spec: &Value,
        options: ResolveOptions,
    ) -> Result<Option<Resolved>> {
        options.validate()?;
        let spec = PathSpec::from_value(spec)?;
        Ok(self.run(root, &spec, options))
    }

    /// Like [`resolve_value`](Self::resolve_value) for a JSON specification.
    pub fn resolve_json(
        &self,
        root: &Value,
        spec: &serde_json::Value,
        options: ResolveOptions,
    ) -> Result<Option<Resolved>> {
        options.validate()?;
        let spec = PathSpec::from_json(spec)?;
        Ok(self.run(root, &spec, options))
    }

    fn run(&self, root: &Value, spec: &PathSpec, options: ResolveOptions) -> Option<Resolved> {
        let assembled = assemble(root, spec, &self.cache)?;

        let mut results: Map = assembled
            .into_iter()
            .map(|(key, value)| (key, normalize(value)))
            .collect();

        if options.serialize {
            results = results
                .into_iter()
                .map(|(key, value)| (key, serialize(value)))
                .collect();
        }

        if options.flatten {
            results = flatten(results)?;
        }

        trace!("Resolved {} entr(ies)", results.len());

        if options.native {
            // First in iteration order; with a multi-match wildcard path the
            // remaining entries are dropped.
            return results.into_iter().next().map(|(_, value)| Resolved::Native(value));
        }

        Some(Resolved::Map(results))
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestpath_core::{Error, Fields};
    use serde_json::json;

    fn map_of(resolved: Option<Resolved>) -> serde_json::Value {
        resolved.map(|r| r.to_json()).unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn test_conflicting_options_rejected_before_traversal() {
        let resolver = PathResolver::new();
        let options = ResolveOptions::new().with_native(true).with_flatten(true);
        let err = resolver.resolve(&Value::Null, "a", options).unwrap_err();
        assert!(matches!(err, Error::ConflictingOptions));
        assert_eq!(resolver.cache_stats().misses, 0);
    }

    #[test]
    fn test_native_unwraps_first_value() {
        let resolver = PathResolver::new();
        let root = Value::from(json!({"a": {"b": 123}}));
        let resolved = resolver
            .resolve(&root, [("", "a.b")], ResolveOptions::new().with_native(true))
            .unwrap();
        assert_eq!(resolved, Some(Resolved::Native(Value::Int(123))));
    }

    #[test]
    fn test_native_with_no_match_is_none() {
        let resolver = PathResolver::new();
        let root = Value::from(json!({"a": 1}));
        let resolved = resolver
            .resolve(&root, "b", ResolveOptions::new().with_native(true))
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_without_serialize_values_are_only_normalized() {
        let resolver = PathResolver::new();
        let inner = Fields::new("Inner").with_field("color", Value::enum_member("Color", "RED"));
        let root = Value::record(Fields::new("Outer").with_field("inner", Value::record(inner)));
        let resolved = resolver
            .resolve(&root, "inner", ResolveOptions::new().with_serialize(false))
            .unwrap()
            .and_then(Resolved::into_map)
            .unwrap();
        // record became a map, its enum field is untouched
        assert_eq!(
            resolved["inner"].get("color").and_then(Value::enum_name),
            Some("RED")
        );
    }

    #[test]
    fn test_resolve_value_rejects_non_spec() {
        let resolver = PathResolver::new();
        let err = resolver
            .resolve_value(&Value::Null, &Value::Int(123), ResolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPathSpec { .. }));
    }

    #[test]
    fn test_resolve_json_with_empty_path_list() {
        let resolver = PathResolver::new();
        let root = Value::from(json!({"a": 1}));
        let resolved = resolver
            .resolve_json(&root, &json!({"": []}), ResolveOptions::default())
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_with_config_uses_defaults() {
        let config = ResolverConfig::default()
            .with_cache_capacity(8)
            .with_options(ResolveOptions::new().with_flatten(true));
        let resolver = PathResolver::with_config(config).unwrap();
        assert_eq!(resolver.cache_stats().capacity, 8);

        let root = Value::from(json!({"d": {"x": 1, "y": 2}}));
        let resolved = resolver.resolve_with_defaults(&root, "d").unwrap();
        assert_eq!(map_of(resolved), json!({"d_x": 1, "d_y": 2}));
    }

    #[test]
    fn test_with_config_rejects_zero_capacity() {
        let config = ResolverConfig::default().with_cache_capacity(0);
        assert!(matches!(
            PathResolver::with_config(config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_shared_resolver_across_threads() {
        const PATHS: [&str; 6] = ["a.x", "a.y", "b.*", "b.0", "b.-1", "c.d.e"];
        const ROUNDS: usize = 50;
        const THREADS: usize = 8;

        let config = ResolverConfig::default().with_cache_capacity(4);
        let resolver = PathResolver::with_config(config).unwrap();
        let root = Value::from(json!({
            "a": {"x": 1, "y": "two"},
            "b": [10, 20, 30],
            "c": {"d": {"e": true}}
        }));
        let expected: Vec<_> = PATHS
            .iter()
            .map(|path| map_of(PathResolver::new().resolve_with_defaults(&root, *path).unwrap()))
            .collect();

        std::thread::scope(|scope| {
            for offset in 0..THREADS {
                let (resolver, root, expected) = (&resolver, &root, &expected);
                scope.spawn(move || {
                    for round in 0..ROUNDS {
                        // Half the threads share a path each round, the rest rotate
                        let index = if offset % 2 == 0 { round } else { round + offset };
                        let index = index % PATHS.len();
                        let resolved = resolver.resolve_with_defaults(root, PATHS[index]).unwrap();
                        assert_eq!(map_of(resolved), expected[index]);
                    }
                });
            }
        });

        let stats = resolver.cache_stats();
        assert!(stats.len <= stats.capacity);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.hits + stats.misses, (THREADS * ROUNDS) as u64);
    }
}
