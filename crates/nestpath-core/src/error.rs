//! Error types for nestpath.
//!
//! Only caller-input mistakes are errors. Data-shape mismatches found while
//! walking a value (missing keys, bad indices, empty intermediates) are logged
//! and contribute nothing to the result instead.

use thiserror::Error;

/// nestpath result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Path specification was neither a dotted-path string nor a mapping
    #[error("path specification must be a mapping or a dotted-path string, got {found}")]
    InvalidPathSpec { found: String },

    /// `native` and `flatten` were both requested
    #[error("native and flatten cannot both be enabled")]
    ConflictingOptions,

    /// Invalid resolver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Conversion through serde_json failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
