//! Orphaned backups
//!
//! A backup whose repository layers have all disappeared. It is reported on
//! every scan until explicitly resolved: the backup is copied back over the
//! target and then removed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use holo_fs::{FileKind, copy_file, file_kind, io, is_newer_than, logical_path};

use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::report::{ApplyOutcome, Report, TargetReport};
use crate::{Error, Result};

/// State of the target belonging to an orphaned backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanAssessment {
    /// Target still holds what the engine last wrote
    Clean,
    /// Target was changed after the engine last wrote it
    Modified,
    /// Target no longer exists
    TargetDeleted,
}

impl OrphanAssessment {
    /// What resolving the orphan will do.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Clean | Self::Modified => "restore",
            Self::TargetDeleted => "delete",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clean => "all repository files were deleted",
            Self::Modified => "all repository files were deleted, target was modified",
            Self::TargetDeleted => "target was deleted",
        }
    }
}

impl std::fmt::Display for OrphanAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A backup without a matching config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedBackup {
    rel_path: PathBuf,
    backup_path: PathBuf,
    target_path: PathBuf,
}

impl OrphanedBackup {
    pub fn new(config: &EngineConfig, rel_path: PathBuf) -> Self {
        let roots = config.roots();
        Self {
            backup_path: roots.backup_path(&rel_path),
            target_path: roots.target_path(&rel_path),
            rel_path,
        }
    }

    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn logical_path(&self) -> String {
        logical_path(&self.rel_path)
    }

    /// Compare the live target against the backup. Read-only.
    pub fn assess(&self) -> Result<OrphanAssessment> {
        match file_kind(&self.target_path)? {
            FileKind::Missing => Ok(OrphanAssessment::TargetDeleted),
            FileKind::Other => Err(Error::NotManageable {
                path: self.target_path.clone(),
            }),
            FileKind::Regular | FileKind::Symlink => {
                if is_newer_than(&self.target_path, &self.backup_path)? {
                    Ok(OrphanAssessment::Modified)
                } else {
                    Ok(OrphanAssessment::Clean)
                }
            }
        }
    }

    /// Restore the backup to the target and delete it.
    ///
    /// A modified target is only overwritten with `force`. When the target is
    /// gone, the backup is deleted without recreating it.
    pub fn resolve(&self, force: bool) -> TargetReport {
        let mut report = Report::new("Working on", self.logical_path());
        match self.resolve_impl(force, &mut report) {
            Ok(outcome) => TargetReport::new(report, outcome),
            Err(e) => TargetReport::failed(report, &e),
        }
    }

    fn resolve_impl(&self, force: bool, report: &mut Report) -> Result<ApplyOutcome> {
        let outcome = match self.assess()? {
            OrphanAssessment::TargetDeleted => ApplyOutcome::Deleted,
            OrphanAssessment::Modified if !force => {
                return Err(Error::UserModified {
                    path: self.logical_path().into(),
                });
            }
            assessment => {
                if assessment == OrphanAssessment::Modified {
                    report.add_line("fix", "overwriting changes made by user");
                }
                copy_file(&self.backup_path, &self.target_path)?;
                report.add_line("restore", self.target_path.display().to_string());
                ApplyOutcome::Restored
            }
        };

        io::remove_file(&self.backup_path)?;
        report.add_line("delete", self.backup_path.display().to_string());
        info!(file = %self.logical_path(), outcome = ?outcome, "resolved orphaned backup");
        Ok(outcome)
    }
}

impl Entity for OrphanedBackup {
    fn entity_id(&self) -> String {
        format!("file:{}", self.logical_path())
    }

    fn definition_files(&self) -> Vec<PathBuf> {
        vec![self.backup_path.clone()]
    }

    fn attributes(&self) -> String {
        self.assess()
            .map(|a| a.description().to_string())
            .unwrap_or_else(|e| e.to_string())
    }

    fn apply(&self, force: bool) -> TargetReport {
        self.resolve(force)
    }
}
