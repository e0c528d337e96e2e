//! Metadata-preserving copies
//!
//! Every write the engine performs on a managed file goes through this
//! module. Regular files get content, permission bits, ownership and
//! timestamps of their source; symlinks are recreated with the same link
//! target. Carrying the mtime over is what makes drift detection work: a
//! file whose mtime still equals that of its source has not been touched by
//! anyone else since.

use std::fs::{self, Metadata};
use std::os::unix::fs::{MetadataExt, PermissionsExt, chown, symlink};
use std::path::Path;

use filetime::FileTime;
use tracing::debug;

use crate::{Error, Result, io};

/// What kind of filesystem entry lives at a path (without following links).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Symlink,
    Missing,
    /// Directories, sockets, devices and other things the engine never manages.
    Other,
}

impl FileKind {
    pub fn is_manageable(self) -> bool {
        matches!(self, Self::Regular | Self::Symlink)
    }
}

/// Classify the entry at `path`.
pub fn file_kind(path: &Path) -> Result<FileKind> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(kind_of(&meta)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileKind::Missing),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn kind_of(meta: &Metadata) -> FileKind {
    let ft = meta.file_type();
    if ft.is_symlink() {
        FileKind::Symlink
    } else if ft.is_file() {
        FileKind::Regular
    } else {
        FileKind::Other
    }
}

/// Whether the engine can manage the entry at `path` (regular file or symlink).
pub fn is_manageable(path: &Path) -> bool {
    file_kind(path).map(FileKind::is_manageable).unwrap_or(false)
}

fn lstat(path: &Path) -> Result<Metadata> {
    fs::symlink_metadata(path).map_err(|e| Error::io(path, e))
}

/// Whether `path1` was modified after `path2`.
///
/// Symlinks at `path1` are never reported as newer: their mtime cannot be
/// set, so it carries no information about who wrote them.
pub fn is_newer_than(path1: &Path, path2: &Path) -> Result<bool> {
    let meta1 = lstat(path1)?;
    let meta2 = lstat(path2)?;
    if meta1.file_type().is_symlink() {
        return Ok(false);
    }
    let mtime1 = FileTime::from_last_modification_time(&meta1);
    let mtime2 = FileTime::from_last_modification_time(&meta2);
    Ok(mtime1 > mtime2)
}

/// Copy a regular file or symlink including its metadata.
///
/// Parent directories of `to` are created as needed. Whatever exists at `to`
/// is replaced.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    copy_file_impl(from, to).map_err(|e| Error::copy(from, to, e))
}

fn copy_file_impl(from: &Path, to: &Path) -> Result<()> {
    match file_kind(from)? {
        FileKind::Regular => {
            let data = io::read_bytes(from)?;
            io::write_atomic(to, &data)?;
            copy_metadata(from, to)
        }
        FileKind::Symlink => copy_symlink(from, to),
        FileKind::Missing => Err(Error::io(
            from,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        )),
        FileKind::Other => Err(Error::NotManageable {
            path: from.to_path_buf(),
        }),
    }
}

fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let link_target = fs::read_link(from).map_err(|e| Error::io(from, e))?;
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Create beside the destination, then rename over it
    let temp_path = io::temp_path(to);
    if fs::symlink_metadata(&temp_path).is_ok() {
        io::remove_file(&temp_path)?;
    }
    symlink(&link_target, &temp_path).map_err(|e| Error::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, to) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(to, e));
    }
    debug!(from = %from.display(), to = %to.display(), "copied symlink");
    Ok(())
}

/// Write `content` to `to`, then give it mode, owner and group of
/// `attributes_from` and the mtime of `mtime_from`.
///
/// Metadata is only applied once the content is in place.
pub fn write_with_metadata(
    to: &Path,
    content: &[u8],
    attributes_from: &Path,
    mtime_from: &Path,
) -> Result<()> {
    io::write_atomic(to, content)?;
    copy_attributes(attributes_from, to)?;
    copy_mtime(mtime_from, to)
}

/// Apply permissions, ownership and timestamps of `from` to `to`.
///
/// Nothing is applied when `to` is a symlink. When `from` is a symlink only
/// its mtime carries over, since its permission bits and owner are
/// meaningless for a regular file.
pub fn copy_metadata(from: &Path, to: &Path) -> Result<()> {
    copy_attributes(from, to)?;
    copy_mtime(from, to)
}

/// Apply permission bits and ownership of a regular file `from` to `to`.
fn copy_attributes(from: &Path, to: &Path) -> Result<()> {
    let source = lstat(from)?;
    let dest = lstat(to)?;
    if dest.file_type().is_symlink() || !source.file_type().is_file() {
        return Ok(());
    }

    // chown may clear setuid/setgid bits, so it has to run before chmod
    chown(to, Some(source.uid()), Some(source.gid())).map_err(|e| Error::io(to, e))?;
    let mode = source.permissions().mode() & 0o7777;
    fs::set_permissions(to, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(to, e))
}

fn copy_mtime(from: &Path, to: &Path) -> Result<()> {
    let source = lstat(from)?;
    if lstat(to)?.file_type().is_symlink() {
        return Ok(());
    }
    let mtime = FileTime::from_last_modification_time(&source);
    filetime::set_file_times(to, mtime, mtime).map_err(|e| Error::io(to, e))
}
