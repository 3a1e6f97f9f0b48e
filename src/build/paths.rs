//! Shader path resolution.
//!
//! A shader is identified by a resources directory and a base name. The
//! source, binary and disassembly live side by side in that directory and
//! differ only by extension.

use std::path::{Path, PathBuf};

use crate::build::RefreshError;

/// Default shader base name.
pub const DEFAULT_SHADER_NAME: &str = "SimpleCopy";
/// Default source extension (OpenCL C).
pub const DEFAULT_SOURCE_EXT: &str = "cl";
/// Default binary extension (SPIR-V module).
pub const DEFAULT_BINARY_EXT: &str = "spv";
/// Default disassembly extension (SPIR-V assembly text).
pub const DEFAULT_DISASSEMBLY_EXT: &str = "spvasm";
/// Resources directory name, a sibling of the executable's directory.
pub const RESOURCES_DIR: &str = "resources";

/// The three paths a refresh works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    /// Shader source file
    pub source: PathBuf,
    /// Compiled SPIR-V binary
    pub binary: PathBuf,
    /// Human-readable disassembly
    pub disassembly: PathBuf,
}

impl ShaderPaths {
    /// Derive the paths for `name` inside `resources_dir` using the default
    /// `.cl` / `.spv` / `.spvasm` extensions.
    pub fn new(resources_dir: &Path, name: &str) -> Self {
        Self::with_extensions(
            resources_dir,
            name,
            DEFAULT_SOURCE_EXT,
            DEFAULT_BINARY_EXT,
            DEFAULT_DISASSEMBLY_EXT,
        )
    }

    /// Derive the paths for `name` inside `resources_dir` with explicit extensions.
    pub fn with_extensions(
        resources_dir: &Path,
        name: &str,
        source_ext: &str,
        binary_ext: &str,
        disassembly_ext: &str,
    ) -> Self {
        let file = |ext: &str| resources_dir.join(format!("{}.{}", name, ext));
        Self { source: file(source_ext), binary: file(binary_ext), disassembly: file(disassembly_ext) }
    }
}

/// Directory containing the running executable, with symlinks resolved.
pub fn self_dir() -> Result<PathBuf, RefreshError> {
    let exe = std::env::current_exe().map_err(RefreshError::SelfLocation)?;
    let exe = std::fs::canonicalize(&exe).unwrap_or(exe);
    Ok(exe.parent().map(Path::to_path_buf).unwrap_or_default())
}

/// The `resources` directory next to `self_dir`'s parent (`<self_dir>/../resources`).
///
/// The `..` component is kept rather than normalised away.
pub fn default_resources_dir(self_dir: &Path) -> PathBuf {
    self_dir.join("..").join(RESOURCES_DIR)
}
