//! Nested-data path resolver.
//!
//! Walks heterogeneous value graphs (mappings, sequences, records,
//! enumerations) with dotted path expressions, fans out over `*` wildcards,
//! then optionally serializes, flattens or unwraps the result.
//!
//! ```rust
//! use nestpath_resolver::{resolve, ResolveOptions, Value};
//! use serde_json::json;
//!
//! let root = Value::from(json!({"a": {"b": {"c": 1, "d": 2}}}));
//! let resolved = resolve(&root, "a.b.*", ResolveOptions::new().with_flatten(true))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(resolved.to_json(), json!({"a_b_c": 1, "a_b_d": 2}));
//! ```

pub mod assemble;
pub mod helpers;
pub mod normalize;
pub mod path;
pub mod resolver;
pub mod traverse;

use once_cell::sync::Lazy;

pub use assemble::{combined_key, PathSpec};
pub use helpers::{build_nested, ensure_list, get_by_path, get_many, index_field, sum_field};
pub use normalize::{flatten, normalize, serialize};
pub use path::{CacheStats, ParsedPath, PathCache, Segment, WILDCARD};
pub use resolver::{PathResolver, Resolved};
pub use traverse::{traverse, Traversal};

pub use nestpath_core::{impl_enumeration, impl_record};
pub use nestpath_core::{
    Enumeration, EnumMember, Error, Fields, Map, Record, ResolveOptions, ResolverConfig, Result,
    Shape, Value,
};

static DEFAULT_RESOLVER: Lazy<PathResolver> = Lazy::new(PathResolver::new);

/// The process-wide resolver used by [`resolve`].
pub fn default_resolver() -> &'static PathResolver {
    &DEFAULT_RESOLVER
}

/// Resolve `spec` against `root` with the process-wide resolver.
pub fn resolve(
    root: &Value,
    spec: impl Into<PathSpec>,
    options: ResolveOptions,
) -> Result<Option<Resolved>> {
    DEFAULT_RESOLVER.resolve(root, spec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestpath_core::config::defaults;

    #[test]
    fn test_default_resolver_ignores_environment() {
        std::env::set_var("NESTPATH_SERIALIZE", "false");
        std::env::set_var("NESTPATH_PATH_CACHE_CAPACITY", "3");

        let resolver = default_resolver();
        assert_eq!(resolver.options(), ResolveOptions::default());
        assert_eq!(resolver.cache_stats().capacity, defaults::PATH_CACHE_CAPACITY);

        let root = Value::record(
            Fields::new("Outer").with_field(
                "c",
                Value::record(
                    Fields::new("Inner").with_field("color", Value::enum_member("Color", "RED")),
                ),
            ),
        );
        let resolved = resolver.resolve_with_defaults(&root, "c").unwrap().unwrap();
        assert_eq!(resolved.to_json(), serde_json::json!({"c": {"color": "RED"}}));

        std::env::remove_var("NESTPATH_SERIALIZE");
        std::env::remove_var("NESTPATH_PATH_CACHE_CAPACITY");
    }
}
