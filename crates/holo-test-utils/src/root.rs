//! [`TestRoot`] builder for reconciliation scenarios.

use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use holo_fs::Roots;
use holo_fs::constants::{DEFAULT_BACKUP_DIR, DEFAULT_REPO_DIR};
use tempfile::TempDir;

/// A temporary directory standing in for `/`, with the repository at
/// `holo/repo` and the backup tree at `holo/backup` below it.
///
/// All `rel` arguments are target-relative, e.g. `etc/foo.conf`.
///
/// # Example
///
/// ```rust,no_run
/// use holo_test_utils::TestRoot;
///
/// let root = TestRoot::new();
/// root.write_target("etc/foo.conf", "pristine\n");
/// root.write_repo("etc/foo.conf", "managed\n");
/// ```
pub struct TestRoot {
    temp_dir: TempDir,
    roots: Roots,
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoot {
    /// Create an empty root containing only the repository directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let roots = Roots::under(
            temp_dir.path(),
            Path::new(DEFAULT_REPO_DIR),
            Path::new(DEFAULT_BACKUP_DIR),
        );
        fs::create_dir_all(roots.repo()).unwrap();
        Self { temp_dir, roots }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn roots(&self) -> Roots {
        self.roots.clone()
    }

    pub fn target_path(&self, rel: &str) -> PathBuf {
        self.roots.target_path(Path::new(rel))
    }

    pub fn backup_path(&self, rel: &str) -> PathBuf {
        self.roots.backup_path(Path::new(rel))
    }

    pub fn repo_path(&self, rel: &str) -> PathBuf {
        self.roots.repo_path(Path::new(rel))
    }

    /// Write a live target file.
    pub fn write_target(&self, rel: &str, content: &str) -> PathBuf {
        write(self.target_path(rel), content)
    }

    /// Write a copy layer into the repository.
    pub fn write_repo(&self, rel: &str, content: &str) -> PathBuf {
        write(self.repo_path(rel), content)
    }

    /// Write an executable layer into the repository. `rel` must include
    /// the script suffix.
    pub fn write_script(&self, rel: &str, body: &str) -> PathBuf {
        let path = write(self.repo_path(rel), body);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Write a backup file directly, bypassing the engine.
    pub fn write_backup(&self, rel: &str, content: &str) -> PathBuf {
        write(self.backup_path(rel), content)
    }

    /// Create a symlink target pointing at `link_target`.
    pub fn symlink_target(&self, rel: &str, link_target: &str) -> PathBuf {
        let path = self.target_path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        symlink(link_target, &path).unwrap();
        path
    }

    pub fn read_target(&self, rel: &str) -> String {
        read(&self.target_path(rel))
    }

    pub fn read_backup(&self, rel: &str) -> String {
        read(&self.backup_path(rel))
    }

    /// Set the mtime of `path` to `secs` after the epoch.
    pub fn set_mtime(&self, path: &Path, secs: i64) {
        filetime::set_symlink_file_times(
            path,
            FileTime::from_unix_time(secs, 0),
            FileTime::from_unix_time(secs, 0),
        )
        .unwrap();
    }

    /// Make the target look edited after the engine last wrote it.
    pub fn touch_later(&self, rel: &str) {
        let mtime = self.mtime(&self.backup_path(rel));
        self.set_mtime(&self.target_path(rel), mtime + 60);
    }

    /// Modification time of `path` in whole seconds, without following links.
    pub fn mtime(&self, path: &Path) -> i64 {
        let meta = fs::symlink_metadata(path).unwrap();
        FileTime::from_last_modification_time(&meta).unix_seconds()
    }

    pub fn assert_exists(&self, path: &Path) {
        assert!(
            fs::symlink_metadata(path).is_ok(),
            "Expected file to exist: {}",
            path.display()
        );
    }

    pub fn assert_not_exists(&self, path: &Path) {
        assert!(
            fs::symlink_metadata(path).is_err(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}

fn write(path: PathBuf, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
}
