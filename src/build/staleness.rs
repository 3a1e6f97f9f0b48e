//! Timestamp-based staleness check.
//!
//! A binary is stale when its source was modified strictly after it. Times
//! are compared at whole-second resolution, so a source and binary written
//! within the same second count as up to date.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::build::RefreshError;

/// Seconds since the Unix epoch, negative for earlier times.
pub type ModificationTimestamp = i64;

/// Convert a `SystemTime` to whole seconds since the epoch (truncating).
pub fn to_timestamp(time: SystemTime) -> ModificationTimestamp {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => {
            let d = before.duration();
            // Truncate toward zero like the positive branch.
            -(d.as_secs() as i64)
        }
    }
}

/// Last-modification time of `path`.
///
/// Fails if the file does not exist or its metadata cannot be read.
pub fn file_mtime(path: &Path) -> Result<ModificationTimestamp, RefreshError> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| RefreshError::metadata(path, e))?;
    Ok(to_timestamp(modified))
}

/// Whether `src` was modified after `binary` was last written.
///
/// Both files must exist.
pub fn check_shader_modified(src: &Path, binary: &Path) -> Result<bool, RefreshError> {
    let src_mtime = file_mtime(src)?;
    let binary_mtime = file_mtime(binary)?;
    log::debug!(
        "mtime {} = {}, {} = {}",
        src.display(),
        src_mtime,
        binary.display(),
        binary_mtime
    );
    Ok(src_mtime > binary_mtime)
}
