//! Configuration loading tests
//!
//! - TOML parsing with defaults for omitted fields
//! - Validation of capacity and option combinations

use nestpath_core::config::{defaults, ResolveOptions, ResolverConfig};
use nestpath_core::Error;

#[test]
fn test_defaults() {
    let config = ResolverConfig::default();
    assert_eq!(config.cache_capacity, defaults::PATH_CACHE_CAPACITY);
    assert_eq!(config.options, ResolveOptions::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_full() {
    let config = ResolverConfig::from_toml_str(
        r#"
        cache_capacity = 256

        [options]
        serialize = false
        flatten = true
        "#,
    )
    .unwrap();
    assert_eq!(config.cache_capacity, 256);
    assert!(!config.options.serialize);
    assert!(config.options.flatten);
    assert!(!config.options.native);
}

#[test]
fn test_from_toml_empty_uses_defaults() {
    let config = ResolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, ResolverConfig::default());
}

#[test]
fn test_from_toml_rejects_conflicting_options() {
    let result = ResolverConfig::from_toml_str(
        r#"
        [options]
        native = true
        flatten = true
        "#,
    );
    assert!(matches!(result, Err(Error::ConflictingOptions)));
}

#[test]
fn test_from_toml_rejects_zero_capacity() {
    let result = ResolverConfig::from_toml_str("cache_capacity = 0");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_from_toml_rejects_malformed_input() {
    let result = ResolverConfig::from_toml_str("cache_capacity = \"lots\"");
    assert!(matches!(result, Err(Error::Config(_))));
}
