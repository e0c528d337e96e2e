//! Backup store
//!
//! The backup of a target holds the pristine version as shipped by its
//! package. It seeds rendering and its mtime is the oracle for drift
//! detection. Backups are created lazily on first encounter and replaced
//! whenever the package manager leaves a new default next to the target.

use std::fs;

use tracing::{info, warn};

use holo_fs::{FileKind, SideCar, copy_file, file_kind, io, is_manageable};

use crate::report::Report;
use crate::{Error, Result};

use super::config_file::ConfigFile;

/// Whether a backup already exists for `file`.
///
/// Anything other than a regular file or symlink at the backup location is
/// an error rather than "no backup".
pub fn has_backup(file: &ConfigFile) -> Result<bool> {
    match file_kind(file.backup_path())? {
        FileKind::Regular | FileKind::Symlink => Ok(true),
        FileKind::Missing => Ok(false),
        FileKind::Other => Err(Error::NotManageable {
            path: file.backup_path().to_path_buf(),
        }),
    }
}

/// Save the live target as backup unless one exists already.
///
/// Returns whether a backup was created.
pub fn ensure_backup(file: &ConfigFile, report: &mut Report) -> Result<bool> {
    if has_backup(file)? {
        return Ok(false);
    }

    copy_file(file.target_path(), file.backup_path())?;
    info!(
        file = %file.logical_path(),
        backup = %file.backup_path().display(),
        "saved pristine version"
    );
    report.add_line("store at", file.backup_path().display().to_string());
    Ok(true)
}

/// Absorb a package manager side-car into the backup.
///
/// A "new default" side-car replaces the backup and is deleted. An "old
/// version saved" side-car means the target itself is the new default: the
/// target becomes the backup and the side-car is moved back into place.
/// Failing to delete an absorbed side-car is only a warning.
///
/// Returns the kind of side-car absorbed, if any.
pub fn absorb_distro_update(file: &ConfigFile, report: &mut Report) -> Result<Option<SideCar>> {
    for (kind, _) in file.package_manager().side_cars() {
        let side_car = file.side_car_path(kind);
        if !is_manageable(&side_car) {
            continue;
        }

        match kind {
            SideCar::NewDefault => {
                copy_file(&side_car, file.backup_path())?;
                report.add_line("absorb", side_car.display().to_string());
                info!(
                    file = %file.logical_path(),
                    side_car = %side_car.display(),
                    "absorbed new default into backup"
                );
                if let Err(e) = io::remove_file(&side_car) {
                    warn!(error = %e, "cannot remove absorbed side-car");
                    report.add_warning(format!("Cannot remove {}: {}", side_car.display(), e));
                }
            }
            SideCar::OldSaved => {
                if !is_manageable(file.target_path()) {
                    return Err(Error::NotManageable {
                        path: file.target_path().to_path_buf(),
                    });
                }
                copy_file(file.target_path(), file.backup_path())?;
                fs::rename(&side_car, file.target_path())
                    .map_err(|e| holo_fs::Error::io(&side_car, e))?;
                report.add_line("absorb", file.target_path().display().to_string());
                report.add_line("restore", side_car.display().to_string());
                info!(
                    file = %file.logical_path(),
                    side_car = %side_car.display(),
                    "absorbed overwritten target into backup"
                );
            }
        }
        return Ok(Some(kind));
    }
    Ok(None)
}
