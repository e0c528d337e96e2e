//! Per-target reconciliation
//!
//! ```text
//! manageable? -> absorb side-car -> ensure backup -> drift check -> render -> write
//! ```
//!
//! The drift check is skipped on the first encounter, when the live file is
//! the pristine version by definition. Any failure stops the pipeline and
//! leaves the target as it was found; side-cars next to a target that
//! cannot be managed are not absorbed.
//!
//! The written target gets mode, owner and group of the last copy layer, or
//! of the backup when all layers are scripts. Its mtime always comes from
//! the backup.

use tracing::{debug, info};

use holo_fs::{is_manageable, write_with_metadata};

use crate::report::{ApplyOutcome, Report, TargetReport};
use crate::{Error, Result};

use super::backup::{absorb_distro_update, ensure_backup, has_backup};
use super::config_file::ConfigFile;
use super::integrity::is_user_modified;
use super::layer::Strategy;
use super::render::render;

/// Reconcile one config file. Never fails; the outcome is in the report.
pub fn apply(file: &ConfigFile, force: bool) -> TargetReport {
    let mut report = Report::new("Working on", file.logical_path());
    match apply_impl(file, force, &mut report) {
        Ok(()) => TargetReport::new(report, ApplyOutcome::Applied),
        Err(e) => {
            debug!(file = %file.logical_path(), error = %e, "skipping");
            TargetReport::failed(report, &e)
        }
    }
}

fn apply_impl(file: &ConfigFile, force: bool, report: &mut Report) -> Result<()> {
    if !is_manageable(file.target_path()) {
        return Err(Error::NotManageable {
            path: file.target_path().to_path_buf(),
        });
    }

    // Decided before absorption, which may create the backup
    let first_encounter = !has_backup(file)?;

    absorb_distro_update(file, report)?;

    let created = ensure_backup(file, report)?;

    if !first_encounter && !created && is_user_modified(file.target_path(), file.backup_path())? {
        if !force {
            return Err(Error::UserModified {
                path: file.logical_path().into(),
            });
        }
        report.add_line("fix", "overwriting changes made by user");
    }

    let rendered = render(file)?;
    for warning in rendered.warnings {
        report.add_warning(warning);
    }

    let attributes_from = file
        .layers()
        .iter()
        .rev()
        .find(|l| l.strategy() == Strategy::Copy)
        .map_or(file.backup_path(), |l| l.path());
    write_with_metadata(
        file.target_path(),
        &rendered.content,
        attributes_from,
        file.backup_path(),
    )?;
    for layer in file.layers() {
        report.add_line(layer.strategy().as_str(), layer.path().display().to_string());
    }
    info!(file = %file.logical_path(), layers = file.layers().len(), "applied");
    Ok(())
}
