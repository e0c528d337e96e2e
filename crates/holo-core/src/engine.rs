//! Reconciliation engine
//!
//! Coordinates a run over all selected targets: scan once, then apply or
//! diff every selected entity independently. Managed files are processed
//! before orphaned backups.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::entity::{Entity, Selection, sort_entities};
use crate::files::{ConfigFile, OrphanedBackup, ScanResult, diff_config_file, diff_orphan, scan_repo};
use crate::report::{BatchReport, Report, TargetReport};
use crate::{Error, Result};

/// Diff of one selected target.
#[derive(Debug)]
pub struct DiffEntry {
    /// Target path, e.g. `/etc/foo.conf`
    pub target: String,
    /// Unified diff (empty when in sync), or why none could be produced
    pub result: Result<String>,
}

/// Entry point for scanning, applying and diffing.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scan the repository. Errors here are fatal for the run.
    pub fn scan(&self) -> Result<ScanResult> {
        scan_repo(&self.config)
    }

    /// All entities found by `scan`, sorted by entity ID.
    pub fn entities<'a>(&self, scan: &'a ScanResult) -> Vec<&'a dyn Entity> {
        let mut entities: Vec<&dyn Entity> = scan
            .files
            .iter()
            .map(|f| f as &dyn Entity)
            .chain(scan.orphans.iter().map(|o| o as &dyn Entity))
            .collect();
        sort_entities(&mut entities);
        entities
    }

    /// Apply every selected file, then resolve every selected orphan.
    ///
    /// Names in `selection` that match nothing are reported as failed
    /// targets. A failing target never stops the batch.
    pub fn apply(&self, scan: &ScanResult, selection: &Selection, force: bool) -> BatchReport {
        let mut batch = BatchReport::default();
        let (files, orphans) = select(scan, selection);

        for file in files {
            batch.push(file.apply(force));
        }
        for orphan in orphans {
            batch.push(orphan.apply(force));
        }
        for name in unknown_names(scan, selection) {
            warn!(target_name = %name, "no such target");
            batch.push(TargetReport::failed(
                Report::new("Working on", name.clone()),
                &Error::UnknownTarget { target: name },
            ));
        }

        info!(
            targets = batch.targets.len(),
            errors = batch.has_errors(),
            "apply finished"
        );
        batch
    }

    /// Diff every selected target against its live content. Writes nothing.
    pub fn diff(&self, scan: &ScanResult, selection: &Selection) -> Vec<DiffEntry> {
        let (files, orphans) = select(scan, selection);
        let mut entries = Vec::with_capacity(files.len() + orphans.len());

        for file in files {
            entries.push(DiffEntry {
                target: file.logical_path(),
                result: diff_config_file(file),
            });
        }
        for orphan in orphans {
            entries.push(DiffEntry {
                target: orphan.logical_path(),
                result: diff_orphan(orphan),
            });
        }
        for name in unknown_names(scan, selection) {
            entries.push(DiffEntry {
                result: Err(Error::UnknownTarget {
                    target: name.clone(),
                }),
                target: name,
            });
        }
        debug!(entries = entries.len(), "diff finished");
        entries
    }
}

fn select<'a>(
    scan: &'a ScanResult,
    selection: &Selection,
) -> (Vec<&'a ConfigFile>, Vec<&'a OrphanedBackup>) {
    let files = scan
        .files
        .iter()
        .filter(|f| selection.matches(&f.entity_id(), Some(&f.logical_path())))
        .collect();
    let orphans = scan
        .orphans
        .iter()
        .filter(|o| selection.matches(&o.entity_id(), Some(&o.logical_path())))
        .collect();
    (files, orphans)
}

/// Selected names that match no file and no orphan.
fn unknown_names(scan: &ScanResult, selection: &Selection) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for name in selection.names() {
        let known = scan
            .files
            .iter()
            .any(|f| *name == f.entity_id() || *name == f.logical_path())
            || scan
                .orphans
                .iter()
                .any(|o| *name == o.entity_id() || *name == o.logical_path());
        if !known && !unknown.contains(name) {
            unknown.push(name.clone());
        }
    }
    unknown
}
