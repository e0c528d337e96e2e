//! Path roots and logical target paths
//!
//! Every managed file is identified by a path relative to the target root
//! (e.g. `etc/foo.conf`). The same relative path locates its backup below the
//! backup root and, modulo a strategy suffix, its layers below the repository
//! root.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// The three directory roots the engine operates on.
///
/// Immutable once constructed; passed explicitly to every component that
/// resolves paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    repo: PathBuf,
    backup: PathBuf,
    target: PathBuf,
}

impl Roots {
    pub fn new(
        repo: impl Into<PathBuf>,
        backup: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repo: repo.into(),
            backup: backup.into(),
            target: target.into(),
        }
    }

    /// Place all three roots below `prefix`.
    ///
    /// `repo_dir` and `backup_dir` are given as absolute paths of the final
    /// system (e.g. `/holo/repo`) and are re-rooted below `prefix`; the
    /// target root becomes `prefix` itself.
    pub fn under(prefix: impl AsRef<Path>, repo_dir: &Path, backup_dir: &Path) -> Self {
        let prefix = prefix.as_ref();
        Self {
            repo: reroot(prefix, repo_dir),
            backup: reroot(prefix, backup_dir),
            target: prefix.to_path_buf(),
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Absolute path of the live target for a relative path.
    pub fn target_path(&self, rel: &Path) -> PathBuf {
        self.target.join(rel)
    }

    /// Absolute path of the backup for a relative path.
    pub fn backup_path(&self, rel: &Path) -> PathBuf {
        self.backup.join(rel)
    }

    /// Absolute path of a repository entry for a relative path.
    pub fn repo_path(&self, rel: &Path) -> PathBuf {
        self.repo.join(rel)
    }
}

fn reroot(prefix: &Path, dir: &Path) -> PathBuf {
    let stripped: PathBuf = dir
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    prefix.join(stripped)
}

/// Strip `base` from `path`, failing if `path` is not below it.
pub fn relative_path(base: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        })
}

/// The path as it appears on the final system, e.g. `/etc/foo.conf`.
///
/// Always uses forward slashes and a leading `/`, independent of the
/// target root the engine runs against.
pub fn logical_path(rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

/// Inverse of [`logical_path`]: `/etc/foo.conf` becomes `etc/foo.conf`.
///
/// Returns `None` for paths that would escape the root (`..` components).
pub fn relative_from_logical(logical: &str) -> Option<PathBuf> {
    let mut rel = PathBuf::new();
    for component in Path::new(logical).components() {
        match component {
            Component::Normal(s) => rel.push(s),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    if rel.as_os_str().is_empty() {
        None
    } else {
        Some(rel)
    }
}
