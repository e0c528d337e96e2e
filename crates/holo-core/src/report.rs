//! Per-target reports
//!
//! Every entity operation produces a [`TargetReport`] value instead of
//! propagating errors, so one failing target never aborts the batch.

use serde::Serialize;

use crate::Error;

/// One `key value` line below a report header, e.g. `store at /holo/backup/etc/foo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub key: String,
    pub value: String,
}

/// What happened to a target, in printable form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Verb phrase for the header, e.g. "Working on"
    pub action: String,
    /// Entity the report is about
    pub target: String,
    pub lines: Vec<ReportLine>,
    /// Advisory problems that did not stop the operation
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Report {
    pub fn new(action: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn add_line(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.lines.push(ReportLine {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Terminal state of one target for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyOutcome {
    /// Rendered content was written to the target
    Applied,
    /// An orphaned backup was copied back to its target and removed
    Restored,
    /// An orphaned backup was removed because its target is gone
    Deleted,
    /// Target was changed by someone else and force was not given
    SkippedUserModified,
    /// Something failed; the target is as it was found
    SkippedError,
}

impl ApplyOutcome {
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::SkippedUserModified | Self::SkippedError)
    }
}

/// Report plus outcome for a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub report: Report,
    pub outcome: ApplyOutcome,
}

impl TargetReport {
    pub fn new(report: Report, outcome: ApplyOutcome) -> Self {
        Self { report, outcome }
    }

    /// Close `report` with `error`, classifying the outcome from the error.
    pub fn failed(mut report: Report, error: &Error) -> Self {
        let outcome = match error {
            Error::UserModified { .. } => ApplyOutcome::SkippedUserModified,
            _ => ApplyOutcome::SkippedError,
        };
        report.add_error(error.to_string());
        Self { report, outcome }
    }
}

/// Collected results of an `apply` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub targets: Vec<TargetReport>,
}

impl BatchReport {
    pub fn push(&mut self, target: TargetReport) {
        self.targets.push(target);
    }

    pub fn count(&self, outcome: ApplyOutcome) -> usize {
        self.targets.iter().filter(|t| t.outcome == outcome).count()
    }

    /// Whether any target failed with an error (user modifications are not errors).
    pub fn has_errors(&self) -> bool {
        self.count(ApplyOutcome::SkippedError) > 0
    }

    pub fn find(&self, target: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.report.target == target)
    }
}
