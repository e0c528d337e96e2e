//! Apply command implementation

use colored::Colorize;

use holo_core::{ApplyOutcome, BatchReport, Engine, Selection, TargetReport};

use crate::error::Result;

/// Run the apply command
///
/// Per-target failures are printed but do not fail the command; only a
/// failing scan does.
pub fn run_apply(engine: &Engine, targets: &[String], force: bool, json: bool) -> Result<()> {
    let scan = engine.scan()?;
    let batch = engine.apply(&scan, &Selection::new(targets.iter().cloned()), force);

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    for target in &batch.targets {
        print_target_report(target);
    }
    print_summary(&batch);
    Ok(())
}

/// Print one report in the `Working on /etc/foo.conf` block format.
pub fn print_target_report(target: &TargetReport) {
    let report = &target.report;
    println!("{} {}", report.action, report.target.bold());
    for line in &report.lines {
        println!("    {:>8} {}", line.key, line.value);
    }
    for warning in &report.warnings {
        println!("    {} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.errors {
        println!("    {} {}", "!!".red().bold(), error);
    }
    println!();
}

fn print_summary(batch: &BatchReport) {
    if batch.targets.is_empty() {
        println!("{} Nothing to apply.", "OK".green().bold());
        return;
    }

    let changed = batch.count(ApplyOutcome::Applied)
        + batch.count(ApplyOutcome::Restored)
        + batch.count(ApplyOutcome::Deleted);
    let modified = batch.count(ApplyOutcome::SkippedUserModified);
    let failed = batch.count(ApplyOutcome::SkippedError);

    let label = if failed > 0 {
        "ERROR".red().bold()
    } else if modified > 0 {
        "SKIPPED".yellow().bold()
    } else {
        "OK".green().bold()
    };
    println!(
        "{} {} applied, {} modified by user, {} failed",
        label, changed, modified, failed
    );
    if modified > 0 {
        println!("Run {} to overwrite local changes.", "holo apply --force".cyan());
    }
}
