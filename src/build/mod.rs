//! Shader build step for shader-refresh
//!
//! Decides whether a SPIR-V binary is stale relative to its OpenCL C source
//! and, if so, regenerates it and its disassembly with the external compiler.
//!
//! # Overview
//!
//! The build step consists of:
//! - **Paths**: Derive source, binary and disassembly paths from one base name
//! - **Staleness**: Compare the source and binary modification times
//! - **Compiler**: Invoke the compiler twice when the binary is stale
//!
//! # Example
//!
//! ```ignore
//! use shader_refresh::build::{default_resources_dir, self_dir, Compiler, ShaderBuildStep, ShaderPaths};
//!
//! let resources = default_resources_dir(&self_dir()?);
//! let paths = ShaderPaths::new(&resources, "SimpleCopy");
//! let compiler = Compiler::from_env("CLSPV_EXE_PATH", "clspv")?;
//!
//! let outcome = ShaderBuildStep::new(paths, compiler).run(&mut std::io::stdout())?;
//! println!("{}", outcome.summary());
//! ```

pub mod compiler;
pub mod error;
pub mod paths;
pub mod result;
pub mod staleness;
pub mod step;

pub use compiler::*;
pub use error::*;
pub use paths::*;
pub use result::*;
pub use staleness::*;
pub use step::*;
