//! Engine configuration
//!
//! Settings are read from an optional TOML file. All paths in it describe the
//! final system; they are re-rooted below the target root so the engine can
//! run against a chroot or a scratch directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use holo_fs::constants::{DEFAULT_BACKUP_DIR, DEFAULT_CONFIG_FILE, DEFAULT_REPO_DIR};
use holo_fs::{ConfigStore, DEFAULT_SCRIPT_SUFFIX, PackageManager, Roots};

use crate::{Error, Result};

/// Contents of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Repository root on the final system
    pub repo_dir: PathBuf,
    /// Backup root on the final system
    pub backup_dir: PathBuf,
    /// Whose side-car files get absorbed
    pub package_manager: PackageManager,
    /// Suffix marking repository scripts
    pub script_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from(DEFAULT_REPO_DIR),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            package_manager: PackageManager::default(),
            script_suffix: DEFAULT_SCRIPT_SUFFIX.to_string(),
        }
    }
}

/// Resolved configuration handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    roots: Roots,
    package_manager: PackageManager,
    script_suffix: String,
}

impl EngineConfig {
    /// Configuration with explicit roots and default conventions.
    pub fn new(roots: Roots) -> Self {
        let settings = Settings::default();
        Self {
            roots,
            package_manager: settings.package_manager,
            script_suffix: settings.script_suffix,
        }
    }

    /// Resolve `settings` below the target root `root`.
    pub fn from_settings(settings: Settings, root: &Path) -> Result<Self> {
        validate_suffix(&settings.script_suffix)?;
        Ok(Self {
            roots: Roots::under(root, &settings.repo_dir, &settings.backup_dir),
            package_manager: settings.package_manager,
            script_suffix: settings.script_suffix,
        })
    }

    /// Load settings from `config_file` (or the default location below
    /// `root`) and resolve them. A missing default file means defaults.
    pub fn load(config_file: Option<&Path>, root: &Path) -> Result<Self> {
        let store = ConfigStore::new();
        let settings: Settings = match config_file {
            Some(path) => store.load(path)?,
            None => {
                let default_path = root.join(DEFAULT_CONFIG_FILE.trim_start_matches('/'));
                debug!(path = %default_path.display(), "looking for config file");
                store.load_or_default(&default_path)?
            }
        };
        Self::from_settings(settings, root)
    }

    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn with_script_suffix(mut self, suffix: impl Into<String>) -> Result<Self> {
        let suffix = suffix.into();
        validate_suffix(&suffix)?;
        self.script_suffix = suffix;
        Ok(self)
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn script_suffix(&self) -> &str {
        &self.script_suffix
    }
}

fn validate_suffix(suffix: &str) -> Result<()> {
    if suffix.len() < 2 || !suffix.starts_with('.') || suffix.contains('/') {
        return Err(Error::Config {
            message: format!(
                "script_suffix must look like \".ext\", got {:?}",
                suffix
            ),
        });
    }
    Ok(())
}
