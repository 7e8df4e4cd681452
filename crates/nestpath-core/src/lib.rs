//! Core types for nestpath.
//!
//! This crate defines the value model walked by the resolver, the explicit
//! record/enumeration capabilities caller types implement, and the shared
//! error and configuration types.

pub mod config;
pub mod error;
pub mod record;
pub mod value;

pub use config::{ResolveOptions, ResolverConfig};
pub use error::{Error, Result};
pub use record::{Enumeration, Record};
pub use value::{EnumMember, Fields, Map, Shape, Value};
