//! Tests for the metadata-preserving copy primitives

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt, symlink};

use filetime::FileTime;
use holo_fs::{FileKind, copy_file, copy_metadata, file_kind, is_newer_than, write_with_metadata};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn mtime(path: &std::path::Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::symlink_metadata(path).unwrap())
}

#[test]
fn copy_file_preserves_content_mode_and_mtime() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("source.conf");
    fs::write(&from, "key = value\n").unwrap();
    fs::set_permissions(&from, fs::Permissions::from_mode(0o640)).unwrap();
    filetime::set_file_mtime(&from, FileTime::from_unix_time(1_500_000_000, 123)).unwrap();

    let to = temp.path().join("nested/dir/copy.conf");
    copy_file(&from, &to).unwrap();

    assert_eq!(fs::read_to_string(&to).unwrap(), "key = value\n");
    let meta = fs::metadata(&to).unwrap();
    assert_eq!(meta.permissions().mode() & 0o7777, 0o640);
    assert_eq!(meta.uid(), fs::metadata(&from).unwrap().uid());
    assert_eq!(mtime(&to), mtime(&from));
}

#[test]
fn copy_file_replaces_existing_destination() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("a");
    let to = temp.path().join("b");
    fs::write(&from, "new").unwrap();
    fs::write(&to, "old old old").unwrap();

    copy_file(&from, &to).unwrap();

    assert_eq!(fs::read_to_string(&to).unwrap(), "new");
}

#[test]
fn copy_file_recreates_symlinks() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("link");
    symlink("/usr/share/zoneinfo/UTC", &from).unwrap();
    let to = temp.path().join("backup/link");

    copy_file(&from, &to).unwrap();

    assert_eq!(file_kind(&to).unwrap(), FileKind::Symlink);
    assert_eq!(
        fs::read_link(&to).unwrap(),
        std::path::PathBuf::from("/usr/share/zoneinfo/UTC")
    );
}

#[test]
fn copy_file_over_symlink_replaces_the_link() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("regular");
    fs::write(&from, "content").unwrap();
    let elsewhere = temp.path().join("elsewhere");
    fs::write(&elsewhere, "untouched").unwrap();
    let to = temp.path().join("link");
    symlink(&elsewhere, &to).unwrap();

    copy_file(&from, &to).unwrap();

    assert_eq!(file_kind(&to).unwrap(), FileKind::Regular);
    assert_eq!(fs::read_to_string(&elsewhere).unwrap(), "untouched");
}

#[test]
fn copy_file_missing_source_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = copy_file(&temp.path().join("missing"), &temp.path().join("to")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn copy_file_rejects_directories() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("dir");
    fs::create_dir(&dir).unwrap();
    assert!(copy_file(&dir, &temp.path().join("to")).is_err());
}

#[test]
fn write_with_metadata_splits_attributes_and_mtime() {
    let temp = TempDir::new().unwrap();
    let layer = temp.path().join("layer");
    fs::write(&layer, "managed").unwrap();
    fs::set_permissions(&layer, fs::Permissions::from_mode(0o600)).unwrap();
    filetime::set_file_mtime(&layer, FileTime::from_unix_time(2_000_000, 0)).unwrap();
    let backup = temp.path().join("backup");
    fs::write(&backup, "pristine").unwrap();
    fs::set_permissions(&backup, fs::Permissions::from_mode(0o644)).unwrap();
    filetime::set_file_mtime(&backup, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let target = temp.path().join("target");
    fs::write(&target, "whatever").unwrap();
    write_with_metadata(&target, b"rendered", &layer, &backup).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "rendered");
    assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o7777, 0o600);
    assert_eq!(mtime(&target), mtime(&backup));
}

#[test]
fn write_with_metadata_from_symlink_keeps_written_mode() {
    let temp = TempDir::new().unwrap();
    let backup = temp.path().join("backup");
    symlink("somewhere", &backup).unwrap();

    let target = temp.path().join("target");
    write_with_metadata(&target, b"rendered", &backup, &backup).unwrap();

    assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o7777, 0o600);
    assert_eq!(mtime(&target), mtime(&backup));
}

#[test]
fn copy_metadata_from_symlink_only_carries_mtime() {
    let temp = TempDir::new().unwrap();
    let link = temp.path().join("link");
    symlink("somewhere", &link).unwrap();
    let target = temp.path().join("target");
    fs::write(&target, "x").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

    copy_metadata(&link, &target).unwrap();

    assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o7777, 0o644);
    assert_eq!(mtime(&target), mtime(&link));
}

#[test]
fn is_newer_than_compares_mtimes() {
    let temp = TempDir::new().unwrap();
    let older = temp.path().join("older");
    let newer = temp.path().join("newer");
    fs::write(&older, "a").unwrap();
    fs::write(&newer, "b").unwrap();
    filetime::set_file_mtime(&older, FileTime::from_unix_time(1_000, 0)).unwrap();
    filetime::set_file_mtime(&newer, FileTime::from_unix_time(2_000, 0)).unwrap();

    assert!(is_newer_than(&newer, &older).unwrap());
    assert!(!is_newer_than(&older, &newer).unwrap());
    assert!(!is_newer_than(&older, &older).unwrap());
}
