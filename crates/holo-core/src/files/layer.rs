//! Repository layers

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// How a repository layer contributes to its target's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The layer file replaces the content verbatim.
    Copy,
    /// The layer file is a program reading the content so far on stdin and
    /// writing the new content to stdout.
    ExternalProgram,
}

impl Strategy {
    /// Short verb used in scan output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "apply",
            Self::ExternalProgram => "passthru",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One repository file contributing to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLayer {
    /// Absolute path of the repository file
    path: PathBuf,
    /// Path relative to the repository root; orders layers
    rel_path: PathBuf,
    /// Target path relative to the target root
    target_rel: PathBuf,
    strategy: Strategy,
}

impl RepositoryLayer {
    /// Classify the repository file at `rel_path` (relative to `repo_root`).
    ///
    /// A trailing `script_suffix` selects [`Strategy::ExternalProgram`] and is
    /// stripped to obtain the target path.
    pub fn new(repo_root: &Path, rel_path: PathBuf, script_suffix: &str) -> Self {
        let rel_bytes = rel_path.as_os_str().as_bytes();
        let (target_rel, strategy) = match rel_bytes.strip_suffix(script_suffix.as_bytes()) {
            Some(base) if !base.is_empty() && !base.ends_with(b"/") => (
                PathBuf::from(OsStr::from_bytes(base)),
                Strategy::ExternalProgram,
            ),
            _ => (rel_path.clone(), Strategy::Copy),
        };
        Self {
            path: repo_root.join(&rel_path),
            rel_path,
            target_rel,
            strategy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    pub fn target_rel(&self) -> &Path {
        &self.target_rel
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl PartialOrd for RepositoryLayer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepositoryLayer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rel_path.cmp(&other.rel_path)
    }
}
