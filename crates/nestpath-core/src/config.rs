//! Resolver configuration.
//!
//! Defaults live in constant modules so callers and tests can refer to them.
//! A caller may override them with an explicit [`ResolverConfig`], built in
//! code or parsed from a TOML document it supplies.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default values
pub mod defaults {
    /// Number of parsed path strings kept by the path cache
    pub const PATH_CACHE_CAPACITY: usize = 128;
    pub const NATIVE: bool = false;
    pub const SERIALIZE: bool = true;
    pub const FLATTEN: bool = false;
}

/// Options recognized by a single resolve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Unwrap a single result instead of returning a mapping
    pub native: bool,
    /// Deep-convert results into plain values
    pub serialize: bool,
    /// Collapse nested results into compound keys
    pub flatten: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            native: defaults::NATIVE,
            serialize: defaults::SERIALIZE,
            flatten: defaults::FLATTEN,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    pub fn with_serialize(mut self, serialize: bool) -> Self {
        self.serialize = serialize;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// `native` and `flatten` are mutually exclusive.
    pub fn validate(&self) -> Result<()> {
        if self.native && self.flatten {
            return Err(Error::ConflictingOptions);
        }
        Ok(())
    }
}

/// Configuration for a resolver instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Parsed-path cache capacity (entries)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Options applied by calls that do not pass their own
    #[serde(default)]
    pub options: ResolveOptions,
}

fn default_cache_capacity() -> usize {
    defaults::PATH_CACHE_CAPACITY
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: defaults::PATH_CACHE_CAPACITY,
            options: ResolveOptions::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse and validate a TOML document.
    ///
    /// ```toml
    /// cache_capacity = 256
    ///
    /// [options]
    /// serialize = false
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache_capacity must be greater than zero".into()));
        }
        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ResolveOptions::default();
        assert!(!options.native);
        assert!(options.serialize);
        assert!(!options.flatten);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_native_and_flatten_conflict() {
        let options = ResolveOptions::new().with_native(true).with_flatten(true);
        assert!(matches!(options.validate(), Err(Error::ConflictingOptions)));
    }
}
