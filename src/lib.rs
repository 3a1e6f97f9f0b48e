//! shader-refresh - Library for keeping compiled shaders fresh
//!
//! This library provides functionality to:
//! - Resolve a shader's source, SPIR-V binary and disassembly paths
//! - Compare source and binary modification times
//! - Invoke the external `clspv` compiler when the binary is stale
//! - Optionally watch the source and refresh on every change

pub mod build;
pub mod cli;
pub mod config;
#[cfg(feature = "watch")]
pub mod watch;
