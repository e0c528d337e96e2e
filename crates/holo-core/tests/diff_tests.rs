//! Diffs between rendered and live content

use std::fs;

use holo_core::{Engine, EngineConfig, Error, Selection};
use holo_test_utils::TestRoot;
use pretty_assertions::assert_eq;

const FOO: &str = "etc/foo.conf";

fn engine(root: &TestRoot) -> Engine {
    Engine::new(EngineConfig::new(root.roots()))
}

#[test]
fn pending_change_is_shown() {
    let root = TestRoot::new();
    root.write_target(FOO, "port=80\n");
    root.write_repo(FOO, "port=8080\n");

    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    let entries = engine.diff(&scan, &Selection::all());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target, "/etc/foo.conf");
    let diff = entries[0].result.as_ref().unwrap();
    assert_eq!(
        diff.as_str(),
        "--- a/etc/foo.conf\n\
         +++ b/etc/foo.conf\n\
         @@ -1 +1 @@\n\
         -port=8080\n\
         +port=80\n"
    );
    // Diffing never writes
    root.assert_not_exists(&root.backup_path(FOO));
    assert_eq!(root.read_target(FOO), "port=80\n");
}

#[test]
fn applied_file_has_empty_diff() {
    let root = TestRoot::new();
    root.write_target(FOO, "A\n");
    root.write_repo(FOO, "B\n");
    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    engine.apply(&scan, &Selection::all(), false);

    let entries = engine.diff(&scan, &Selection::all());

    assert_eq!(entries[0].result.as_ref().unwrap(), "");
}

#[test]
fn orphan_diffs_against_backup() {
    let root = TestRoot::new();
    root.write_target(FOO, "A\n");
    root.write_repo(FOO, "B\n");
    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    engine.apply(&scan, &Selection::all(), false);
    fs::remove_file(root.repo_path(FOO)).unwrap();

    let scan = engine.scan().unwrap();
    let entries = engine.diff(&scan, &Selection::all());

    let diff = entries[0].result.as_ref().unwrap();
    assert!(diff.contains("-A\n"));
    assert!(diff.contains("+B\n"));
}

#[test]
fn missing_target_diffs_against_dev_null() {
    let root = TestRoot::new();
    root.write_repo(FOO, "B\n");

    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    let entries = engine.diff(&scan, &Selection::all());

    let diff = entries[0].result.as_ref().unwrap();
    assert!(diff.contains("+++ /dev/null\n"));
    assert!(diff.contains("-B\n"));
}

#[test]
fn per_target_errors_do_not_stop_diffing() {
    let root = TestRoot::new();
    root.write_target("etc/a.conf", "a\n");
    root.write_repo("etc/a.conf.holoscript", "#!/bin/sh\ncat\n");
    root.write_target("etc/b.conf", "b\n");
    root.write_repo("etc/b.conf", "B\n");

    let engine = engine(&root);
    let scan = engine.scan().unwrap();
    let entries = engine.diff(&scan, &Selection::all());

    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0].result, Err(Error::ProgramSpawn { .. })));
    assert!(entries[1].result.as_ref().unwrap().contains("+b\n"));
}

#[test]
fn unknown_target_is_an_entry_error() {
    let root = TestRoot::new();
    let engine = engine(&root);
    let scan = engine.scan().unwrap();

    let entries = engine.diff(&scan, &Selection::new(["/etc/nope"]));

    assert_eq!(entries.len(), 1);
    assert!(matches!(entries[0].result, Err(Error::UnknownTarget { .. })));
}
