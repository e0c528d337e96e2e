//! Orphaned backup detection and resolution

use std::fs;

use holo_core::{ApplyOutcome, Engine, EngineConfig, Entity, OrphanAssessment, Selection};
use holo_test_utils::TestRoot;
use pretty_assertions::assert_eq;

const FOO: &str = "etc/foo.conf";

fn engine(root: &TestRoot) -> Engine {
    Engine::new(EngineConfig::new(root.roots()))
}

/// Apply once, then remove every layer so the backup is orphaned.
fn orphaned_root() -> TestRoot {
    let root = TestRoot::new();
    root.write_target(FOO, "A\n");
    root.write_repo(FOO, "B\n");
    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    engine.apply(&scan, &Selection::all(), false);
    fs::remove_file(root.repo_path(FOO)).unwrap();
    root
}

#[test]
fn removed_layers_leave_an_orphan() {
    let root = orphaned_root();
    let scan = engine(&root).scan().unwrap();

    assert!(scan.files.is_empty());
    assert_eq!(scan.orphans.len(), 1);
    let orphan = scan.find_orphan("/etc/foo.conf").unwrap();
    assert_eq!(orphan.assess().unwrap(), OrphanAssessment::Clean);
    assert_eq!(orphan.entity_id(), "file:/etc/foo.conf");
    assert_eq!(orphan.attributes(), "all repository files were deleted");
}

#[test]
fn scan_does_not_touch_orphans() {
    let root = orphaned_root();
    engine(&root).scan().unwrap();
    engine(&root).scan().unwrap();

    assert_eq!(root.read_backup(FOO), "A\n");
    assert_eq!(root.read_target(FOO), "B\n");
}

#[test]
fn clean_orphan_is_restored() {
    let root = orphaned_root();
    let engine = engine(&root);
    let scan = engine.scan().unwrap();

    let batch = engine.apply(&scan, &Selection::all(), false);

    assert_eq!(batch.targets[0].outcome, ApplyOutcome::Restored);
    assert_eq!(root.read_target(FOO), "A\n");
    root.assert_not_exists(&root.backup_path(FOO));
    assert!(engine.scan().unwrap().is_empty());
}

#[test]
fn modified_orphan_needs_force() {
    let root = orphaned_root();
    root.write_target(FOO, "C\n");
    root.touch_later(FOO);
    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    assert_eq!(
        scan.orphans[0].assess().unwrap(),
        OrphanAssessment::Modified
    );

    let batch = engine.apply(&scan, &Selection::all(), false);
    assert_eq!(batch.targets[0].outcome, ApplyOutcome::SkippedUserModified);
    assert_eq!(root.read_target(FOO), "C\n");
    root.assert_exists(&root.backup_path(FOO));

    let batch = engine.apply(&scan, &Selection::all(), true);
    assert_eq!(batch.targets[0].outcome, ApplyOutcome::Restored);
    assert_eq!(root.read_target(FOO), "A\n");
    root.assert_not_exists(&root.backup_path(FOO));
}

#[test]
fn orphan_with_deleted_target_is_dropped() {
    let root = orphaned_root();
    fs::remove_file(root.target_path(FOO)).unwrap();
    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    assert_eq!(
        scan.orphans[0].assess().unwrap(),
        OrphanAssessment::TargetDeleted
    );

    let batch = engine.apply(&scan, &Selection::all(), false);

    assert_eq!(batch.targets[0].outcome, ApplyOutcome::Deleted);
    root.assert_not_exists(&root.target_path(FOO));
    root.assert_not_exists(&root.backup_path(FOO));
}

#[test]
fn orphans_are_processed_after_files() {
    let root = orphaned_root();
    root.write_target("etc/zzz.conf", "z\n");
    root.write_repo("etc/zzz.conf", "Z\n");
    let engine = engine(&root);
    let scan = engine.scan().unwrap();

    let batch = engine.apply(&scan, &Selection::all(), false);
    let order: Vec<&str> = batch
        .targets
        .iter()
        .map(|t| t.report.target.as_str())
        .collect();

    assert_eq!(order, vec!["/etc/zzz.conf", "/etc/foo.conf"]);
}

#[test]
fn entities_list_files_and_orphans_by_id() {
    let root = orphaned_root();
    root.write_repo("etc/bar.conf", "bar\n");
    root.write_repo("etc/zzz.conf", "zzz\n");
    let engine = engine(&root);
    let scan = engine.scan().unwrap();

    let ids: Vec<String> = engine
        .entities(&scan)
        .iter()
        .map(|e| e.entity_id())
        .collect();

    assert_eq!(
        ids,
        vec!["file:/etc/bar.conf", "file:/etc/foo.conf", "file:/etc/zzz.conf"]
    );
    assert_eq!(
        engine.entities(&scan)[1].definition_files(),
        vec![root.backup_path(FOO)]
    );
}
