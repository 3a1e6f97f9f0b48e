//! Configuration schema types for `shader-refresh.toml`
//!
//! Every section and field is optional; an empty file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::build::{
    DEFAULT_BINARY_EXT, DEFAULT_COMPILER_ENV, DEFAULT_COMPILER_EXE, DEFAULT_DISASSEMBLY_EXT,
    DEFAULT_SHADER_NAME, DEFAULT_SOURCE_EXT,
};

/// Shader location section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Directory holding the shader files.
    ///
    /// `None` means `<self_dir>/../resources`. A relative path is resolved
    /// against the directory of the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<PathBuf>,
    /// Base name shared by source, binary and disassembly
    #[serde(default = "default_name")]
    pub name: String,
    /// Source file extension
    #[serde(default = "default_source_ext")]
    pub source_ext: String,
    /// Binary file extension
    #[serde(default = "default_binary_ext")]
    pub binary_ext: String,
    /// Disassembly file extension
    #[serde(default = "default_disassembly_ext")]
    pub disassembly_ext: String,
}

fn default_name() -> String {
    DEFAULT_SHADER_NAME.to_string()
}

fn default_source_ext() -> String {
    DEFAULT_SOURCE_EXT.to_string()
}

fn default_binary_ext() -> String {
    DEFAULT_BINARY_EXT.to_string()
}

fn default_disassembly_ext() -> String {
    DEFAULT_DISASSEMBLY_EXT.to_string()
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            resources: None,
            name: default_name(),
            source_ext: default_source_ext(),
            binary_ext: default_binary_ext(),
            disassembly_ext: default_disassembly_ext(),
        }
    }
}

/// External compiler section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Environment variable naming the compiler's directory
    #[serde(default = "default_env")]
    pub env: String,
    /// Executable stem (platform suffix appended)
    #[serde(default = "default_exe")]
    pub exe: String,
}

fn default_env() -> String {
    DEFAULT_COMPILER_ENV.to_string()
}

fn default_exe() -> String {
    DEFAULT_COMPILER_EXE.to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self { env: default_env(), exe: default_exe() }
    }
}

/// Build behaviour section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Compile without comparing timestamps
    #[serde(default)]
    pub force: bool,
    /// Exit with an error status when a compile fails
    #[serde(default)]
    pub strict: bool,
}

/// Watch mode section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

/// Complete `shader-refresh.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Shader location
    #[serde(default)]
    pub shader: ShaderConfig,
    /// External compiler
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Build behaviour
    #[serde(default)]
    pub build: BuildConfig,
    /// Watch mode
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "shader.name")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.message)
    }
}

impl RefreshConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let required = [
            ("shader.name", &self.shader.name),
            ("shader.source_ext", &self.shader.source_ext),
            ("shader.binary_ext", &self.shader.binary_ext),
            ("shader.disassembly_ext", &self.shader.disassembly_ext),
            ("compiler.env", &self.compiler.env),
            ("compiler.exe", &self.compiler.exe),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a non-empty string".to_string(),
                });
            }
        }

        // The three outputs must not collide
        let exts = [&self.shader.source_ext, &self.shader.binary_ext, &self.shader.disassembly_ext];
        if exts[0] == exts[1] || exts[0] == exts[2] || exts[1] == exts[2] {
            errors.push(ConfigValidationError {
                field: "shader".to_string(),
                message: "source, binary and disassembly extensions must differ".to_string(),
            });
        }

        if self.compiler.env.contains('=') {
            errors.push(ConfigValidationError {
                field: "compiler.env".to_string(),
                message: "must not contain '='".to_string(),
            });
        }

        if self.watch.debounce_ms == 0 {
            errors.push(ConfigValidationError {
                field: "watch.debounce_ms".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }
}
