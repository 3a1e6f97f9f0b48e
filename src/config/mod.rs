//! Configuration module for shader-refresh
//!
//! Provides types and parsing for the optional `shader-refresh.toml`.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::*;
