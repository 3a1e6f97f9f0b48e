//! Refresh result types.
//!
//! Contains types for representing the outcome of a refresh.

use std::fmt;

/// Outcome of a single compiler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    /// Compiler exited with code 0
    Success,
    /// Compiler exited nonzero, was killed, or could not be started
    Failed,
}

impl CompileStatus {
    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, CompileStatus::Failed)
    }
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileStatus::Success => write!(f, "Success"),
            CompileStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Result of one pass of the build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Binary was at least as new as the source; nothing ran
    UpToDate,
    /// Source was newer (or a rebuild was forced); both invocations ran
    Rebuilt {
        /// Status of the binary compile
        binary: CompileStatus,
        /// Status of the disassembly compile
        disassembly: CompileStatus,
    },
}

impl RefreshOutcome {
    /// Whether the compiler was invoked.
    pub fn was_rebuilt(&self) -> bool {
        matches!(self, RefreshOutcome::Rebuilt { .. })
    }

    /// Whether any invocation failed.
    pub fn has_failures(&self) -> bool {
        match self {
            RefreshOutcome::UpToDate => false,
            RefreshOutcome::Rebuilt { binary, disassembly } => {
                binary.is_failure() || disassembly.is_failure()
            }
        }
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        match self {
            RefreshOutcome::UpToDate => "up to date".to_string(),
            RefreshOutcome::Rebuilt { binary, disassembly } => {
                format!("rebuilt (binary: {}, disassembly: {})", binary, disassembly)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(CompileStatus::Success.to_string(), "Success");
        assert_eq!(CompileStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_up_to_date_has_no_failures() {
        assert!(!RefreshOutcome::UpToDate.has_failures());
        assert!(!RefreshOutcome::UpToDate.was_rebuilt());
    }

    #[test]
    fn test_one_failed_invocation_is_a_failure() {
        let outcome = RefreshOutcome::Rebuilt {
            binary: CompileStatus::Success,
            disassembly: CompileStatus::Failed,
        };
        assert!(outcome.was_rebuilt());
        assert!(outcome.has_failures());
        assert_eq!(outcome.summary(), "rebuilt (binary: Success, disassembly: Failed)");
    }
}
