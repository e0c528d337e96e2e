//! Diff rendering
//!
//! Shows how the live target differs from what the engine would write (for
//! managed files) or from the backup (for orphans). Writes nothing.

use std::path::Path;

use similar::TextDiff;

use holo_fs::{FileKind, file_kind};

use crate::{Error, Result};

use super::config_file::ConfigFile;
use super::orphan::OrphanedBackup;
use super::render::{read_content, render};

/// Lines of unchanged context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Unified diff from the rendered content to the live target.
///
/// Empty when the target already has the rendered content.
pub fn diff_config_file(file: &ConfigFile) -> Result<String> {
    let expected = render(file)?.content;
    let logical = file.logical_path();
    diff_against_target(&expected, file.target_path(), &logical)
}

/// Unified diff from the backup to the live target of an orphan.
pub fn diff_orphan(orphan: &OrphanedBackup) -> Result<String> {
    let expected = read_content(orphan.backup_path())?;
    let logical = orphan.logical_path();
    diff_against_target(&expected, orphan.target_path(), &logical)
}

fn diff_against_target(expected: &[u8], target: &Path, logical: &str) -> Result<String> {
    let old_label = format!("a{}", logical);
    let (actual, new_label) = match file_kind(target)? {
        FileKind::Missing => (Vec::new(), "/dev/null".to_string()),
        FileKind::Other => {
            return Err(Error::NotManageable {
                path: target.to_path_buf(),
            });
        }
        FileKind::Regular | FileKind::Symlink => (read_content(target)?, format!("b{}", logical)),
    };
    Ok(unified_diff(expected, &actual, &old_label, &new_label))
}

/// Render a unified diff between two byte buffers.
///
/// Identical input yields an empty string. If either side is not valid
/// UTF-8 only a `Binary files ... differ` line is produced.
pub fn unified_diff(old: &[u8], new: &[u8], old_label: &str, new_label: &str) -> String {
    if old == new {
        return String::new();
    }
    let (Ok(old), Ok(new)) = (std::str::from_utf8(old), std::str::from_utf8(new)) else {
        return format!("Binary files {} and {} differ\n", old_label, new_label);
    };
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(old_label, new_label)
        .to_string()
}
