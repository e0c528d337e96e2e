//! Drift detection
//!
//! Every write the engine performs gives the target the mtime of its
//! backup. A target newer than its backup has therefore been written by
//! someone else since. Content is deliberately not compared.

use std::path::Path;

use holo_fs::is_newer_than;

use crate::Result;

/// Whether `target` was modified since the engine last wrote it.
///
/// Symlink targets always count as unmodified. The caller skips this check
/// on the first encounter with a target, when there is nothing to compare
/// against yet.
pub fn is_user_modified(target: &Path, backup: &Path) -> Result<bool> {
    Ok(is_newer_than(target, backup)?)
}
