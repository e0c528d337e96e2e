//! Managed config files

use std::path::{Path, PathBuf};

use serde::Serialize;

use holo_fs::{PackageManager, SideCar, logical_path};

use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::report::TargetReport;

use super::apply;
use super::layer::RepositoryLayer;

/// A target file together with the repository layers that define it.
///
/// Never constructed without at least one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    /// Target path relative to the target root
    rel_path: PathBuf,
    target_path: PathBuf,
    backup_path: PathBuf,
    /// In composition order
    layers: Vec<RepositoryLayer>,
    #[serde(skip)]
    package_manager: PackageManager,
}

impl ConfigFile {
    /// Build the descriptor for `rel_path`. Layers are sorted into
    /// composition order; `None` if there are none.
    pub fn new(
        config: &EngineConfig,
        rel_path: PathBuf,
        mut layers: Vec<RepositoryLayer>,
    ) -> Option<Self> {
        if layers.is_empty() {
            return None;
        }
        layers.sort();
        let roots = config.roots();
        Some(Self {
            target_path: roots.target_path(&rel_path),
            backup_path: roots.backup_path(&rel_path),
            rel_path,
            layers,
            package_manager: config.package_manager(),
        })
    }

    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    /// Absolute path of the live target.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Absolute path of the backup (deterministic in the target path).
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn layers(&self) -> &[RepositoryLayer] {
        &self.layers
    }

    /// Target path as seen on the final system, e.g. `/etc/foo.conf`.
    pub fn logical_path(&self) -> String {
        logical_path(&self.rel_path)
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Location where the package manager would leave a side-car of `kind`.
    pub fn side_car_path(&self, kind: SideCar) -> PathBuf {
        let mut path = self.target_path.clone().into_os_string();
        path.push(self.package_manager.suffix(kind));
        PathBuf::from(path)
    }
}

impl Entity for ConfigFile {
    fn entity_id(&self) -> String {
        format!("file:{}", self.logical_path())
    }

    fn definition_files(&self) -> Vec<PathBuf> {
        self.layers.iter().map(|l| l.path().to_path_buf()).collect()
    }

    fn attributes(&self) -> String {
        self.layers
            .iter()
            .map(|l| l.strategy().as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn apply(&self, force: bool) -> TargetReport {
        apply::apply(self, force)
    }
}
