//! Errors that abort a shader refresh.
//!
//! Compiler failures are not errors: they surface as
//! [`CompileStatus::Failed`](crate::build::CompileStatus::Failed) and the
//! step keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Error that terminates a refresh before or during the staleness check.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RefreshError {
    /// The environment variable naming the compiler directory is not set
    #[error("environment variable {var} is not set")]
    MissingEnv {
        /// Name of the variable that was looked up
        var: String,
    },
    /// A path could not be stat'ed (usually because it does not exist)
    #[error("cannot read modification time of '{}': {source}", .path.display())]
    Metadata {
        /// The path whose metadata was requested
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The running executable could not be located
    #[error("cannot locate the running executable: {0}")]
    SelfLocation(#[source] std::io::Error),
    /// Writing a status line failed
    #[error("failed to write status output: {0}")]
    Output(#[from] std::io::Error),
}

impl RefreshError {
    /// Build a metadata error for `path`.
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RefreshError::Metadata { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_metadata_error_names_path() {
        let err = RefreshError::metadata(
            "/tmp/resources/SimpleCopy.spv",
            std::io::Error::new(ErrorKind::NotFound, "No such file or directory"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/resources/SimpleCopy.spv"));
        assert!(msg.contains("No such file or directory"));
    }

    #[test]
    fn test_missing_env_error_names_variable() {
        let err = RefreshError::MissingEnv { var: "CLSPV_EXE_PATH".to_string() };
        assert_eq!(err.to_string(), "environment variable CLSPV_EXE_PATH is not set");
    }
}
