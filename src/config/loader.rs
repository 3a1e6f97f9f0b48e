//! Configuration loading and discovery for `shader-refresh.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::RefreshConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::build::{default_resources_dir, ShaderPaths};

/// Config file name looked up next to the executable.
pub const CONFIG_FILE: &str = "shader-refresh.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        /// Config file that could not be read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        /// Config file that failed to parse
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override resources directory (already absolute)
    pub resources: Option<PathBuf>,
    /// Override shader base name
    pub name: Option<String>,
    /// Force a rebuild
    pub force: Option<bool>,
    /// Fail on compiler errors
    pub strict: Option<bool>,
}

/// Find `shader-refresh.toml` in `dir`.
///
/// # Returns
/// - `Some(path)` if the file exists
/// - `None` otherwise
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.is_file() {
        Some(config_path)
    } else {
        None
    }
}

/// Load configuration from a `shader-refresh.toml` file.
///
/// If a path is provided, loads from that file and fails if it is missing.
/// Otherwise looks for the file in `search_dir` and falls back to the
/// defaults when there is none.
///
/// Returns the configuration together with the directory relative paths in
/// it resolve against (the config file's directory, or `search_dir`).
///
/// # Example
/// ```ignore
/// let (config, root) = load_config(None, &self_dir()?)?;
/// let (config, root) = load_config(Some(Path::new("ci/shader-refresh.toml")), &self_dir()?)?;
/// ```
pub fn load_config(
    path: Option<&Path>,
    search_dir: &Path,
) -> Result<(RefreshConfig, PathBuf), ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(search_dir),
    };

    match config_path {
        Some(p) => {
            let config = load_config_file(&p)?;
            let root = config_root(&p).map(Path::to_path_buf).unwrap_or_default();
            log::debug!("loaded config from {}", p.display());
            Ok((config, root))
        }
        None => Ok((default_config(), search_dir.to_path_buf())),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<RefreshConfig, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config: RefreshConfig = toml::from_str(&contents)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    validate_config(&config)?;
    Ok(config)
}

/// Check a configuration, whether it came from a file or from overrides.
pub fn validate_config(config: &RefreshConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Configuration used when no file is found.
pub fn default_config() -> RefreshConfig {
    RefreshConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut RefreshConfig, overrides: &CliOverrides) {
    if let Some(ref resources) = overrides.resources {
        config.shader.resources = Some(resources.clone());
    }

    if let Some(ref name) = overrides.name {
        config.shader.name = name.clone();
    }

    if let Some(force) = overrides.force {
        config.build.force = force;
    }

    if let Some(strict) = overrides.strict {
        config.build.strict = strict;
    }
}

/// Directory containing a config file.
pub fn config_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to `root`.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with `root`.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Resolve the shader paths a configuration points at.
///
/// `root` anchors a configured `resources` directory; without one the
/// default `<self_dir>/../resources` is used.
pub fn shader_paths(config: &RefreshConfig, root: &Path, self_dir: &Path) -> ShaderPaths {
    let resources = match &config.shader.resources {
        Some(dir) => resolve_path(root, dir),
        None => default_resources_dir(self_dir),
    };
    ShaderPaths::with_extensions(
        &resources,
        &config.shader.name,
        &config.shader.source_ext,
        &config.shader.binary_ext,
        &config.shader.disassembly_ext,
    )
}
