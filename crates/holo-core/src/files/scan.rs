//! Repository scanner
//!
//! Walks the repository, groups its files into layers per target and
//! cross-references the backup tree to find orphans.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use holo_fs::{io, relative_path};

use crate::config::EngineConfig;
use crate::{Error, Result};

use super::config_file::ConfigFile;
use super::layer::RepositoryLayer;
use super::orphan::OrphanedBackup;

/// Everything one scan found.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Managed files, ordered by target path
    pub files: Vec<ConfigFile>,
    /// Backups without repository layers, ordered by target path
    pub orphans: Vec<OrphanedBackup>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.orphans.is_empty()
    }

    pub fn find_file(&self, logical: &str) -> Option<&ConfigFile> {
        self.files.iter().find(|f| f.logical_path() == logical)
    }

    pub fn find_orphan(&self, logical: &str) -> Option<&OrphanedBackup> {
        self.orphans.iter().find(|o| o.logical_path() == logical)
    }
}

/// Scan the repository and backup trees.
///
/// Any unreadable entry aborts the scan; nothing has been written at that
/// point. Entries that are not regular files are skipped.
pub fn scan_repo(config: &EngineConfig) -> Result<ScanResult> {
    let roots = config.roots();
    check_repo_root(roots.repo())?;

    let mut grouped: BTreeMap<PathBuf, Vec<RepositoryLayer>> = BTreeMap::new();
    for rel in walk_files(roots.repo(), false)? {
        let layer = RepositoryLayer::new(roots.repo(), rel, config.script_suffix());
        debug!(
            layer = %layer.rel_path().display(),
            strategy = %layer.strategy(),
            "found repository layer"
        );
        grouped
            .entry(layer.target_rel().to_path_buf())
            .or_default()
            .push(layer);
    }

    let files: Vec<ConfigFile> = grouped
        .into_iter()
        .filter_map(|(rel, layers)| ConfigFile::new(config, rel, layers))
        .collect();

    let orphans = find_orphans(config, &files)?;
    debug!(files = files.len(), orphans = orphans.len(), "scan complete");

    Ok(ScanResult { files, orphans })
}

fn check_repo_root(repo: &Path) -> Result<()> {
    match fs::metadata(repo) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory {
            path: repo.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::RepositoryMissing {
            path: repo.to_path_buf(),
        }),
        Err(e) => Err(Error::ScanFailed {
            path: repo.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Relative paths of all files below `root`, sorted.
///
/// Symlinks are included only when `include_symlinks` is set; the backup
/// tree holds copies of symlink targets, the repository never does.
fn walk_files(root: &Path, include_symlinks: bool) -> Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::ScanFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e
                .io_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| e.to_string()),
        })?;
        let file_type = entry.file_type();
        if !(file_type.is_file() || (include_symlinks && file_type.is_symlink())) {
            continue;
        }
        found.insert(relative_path(root, entry.path())?);
    }
    Ok(found)
}

/// Backups whose target has no config file in `files`.
fn find_orphans(config: &EngineConfig, files: &[ConfigFile]) -> Result<Vec<OrphanedBackup>> {
    let backup_root = config.roots().backup();
    if !backup_root.is_dir() {
        return Ok(Vec::new());
    }

    let backups = walk_files(backup_root, true)?;
    let managed: BTreeSet<PathBuf> = files.iter().map(|f| f.rel_path().to_path_buf()).collect();

    // Scratch files of an interrupted write are not backups
    Ok(backups
        .difference(&managed)
        .filter(|rel| !rel.file_name().is_some_and(io::is_temp_file))
        .map(|rel| OrphanedBackup::new(config, rel.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_fs::Roots;
    use tempfile::TempDir;

    fn setup() -> (TempDir, EngineConfig) {
        let temp = TempDir::new().unwrap();
        let roots = Roots::under(temp.path(), Path::new("/holo/repo"), Path::new("/holo/backup"));
        fs::create_dir_all(roots.repo()).unwrap();
        (temp, EngineConfig::new(roots))
    }

    #[test]
    fn missing_repo_is_fatal() {
        let temp = TempDir::new().unwrap();
        let roots = Roots::under(temp.path(), Path::new("/holo/repo"), Path::new("/holo/backup"));
        let err = scan_repo(&EngineConfig::new(roots)).unwrap_err();
        assert!(matches!(err, Error::RepositoryMissing { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn repo_that_is_a_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let roots = Roots::under(temp.path(), Path::new("/holo/repo"), Path::new("/holo/backup"));
        fs::create_dir_all(roots.repo().parent().unwrap()).unwrap();
        fs::write(roots.repo(), "not a dir").unwrap();
        let err = scan_repo(&EngineConfig::new(roots)).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn empty_repo_scans_to_nothing() {
        let (_temp, config) = setup();
        assert!(scan_repo(&config).unwrap().is_empty());
    }

    #[test]
    fn layers_are_grouped_per_target() {
        let (_temp, config) = setup();
        let repo = config.roots().repo();
        fs::create_dir_all(repo.join("etc")).unwrap();
        fs::write(repo.join("etc/foo.conf"), "base").unwrap();
        fs::write(repo.join("etc/foo.conf.holoscript"), "#!/bin/sh\ncat\n").unwrap();
        fs::write(repo.join("etc/bar.conf"), "bar").unwrap();

        let result = scan_repo(&config).unwrap();
        let targets: Vec<String> = result.files.iter().map(|f| f.logical_path()).collect();
        assert_eq!(targets, vec!["/etc/bar.conf", "/etc/foo.conf"]);
        assert_eq!(result.files[1].layers().len(), 2);
    }

    #[test]
    fn symlinks_in_repo_are_skipped() {
        let (_temp, config) = setup();
        let repo = config.roots().repo();
        fs::create_dir_all(repo.join("etc")).unwrap();
        std::os::unix::fs::symlink("/etc/hostname", repo.join("etc/link")).unwrap();

        assert!(scan_repo(&config).unwrap().files.is_empty());
    }

    #[test]
    fn custom_script_suffix_selects_programs() {
        let (_temp, config) = setup();
        let config = config.with_script_suffix(".sh").unwrap();
        let repo = config.roots().repo();
        fs::create_dir_all(repo.join("etc")).unwrap();
        fs::write(repo.join("etc/foo.conf.sh"), "#!/bin/sh\ncat\n").unwrap();
        fs::write(repo.join("etc/bar.holoscript"), "plain").unwrap();

        let result = scan_repo(&config).unwrap();
        let foo = result.find_file("/etc/foo.conf").unwrap();
        assert_eq!(foo.layers()[0].strategy(), crate::files::Strategy::ExternalProgram);
        assert!(result.find_file("/etc/bar.holoscript").is_some());
    }

    #[test]
    fn leftover_scratch_files_are_not_orphans() {
        let (_temp, config) = setup();
        let backup_dir = config.roots().backup().join("etc");
        fs::create_dir_all(&backup_dir).unwrap();
        let scratch = io::temp_path(&backup_dir.join("foo.conf"));
        fs::write(&scratch, "partial").unwrap();
        fs::write(backup_dir.join("bar.conf"), "pristine").unwrap();

        let result = scan_repo(&config).unwrap();
        let orphans: Vec<String> = result.orphans.iter().map(|o| o.logical_path()).collect();
        assert_eq!(orphans, vec!["/etc/bar.conf"]);
    }
}
