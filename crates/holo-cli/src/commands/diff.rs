//! Diff command implementation
//!
//! Shows the changes `holo apply` would make, as unified diffs from the
//! desired content to the live target. Writes nothing.

use colored::Colorize;

use holo_core::{Engine, Selection};

use crate::error::Result;

/// Run the diff command
pub fn run_diff(engine: &Engine, targets: &[String]) -> Result<()> {
    let scan = engine.scan()?;
    let entries = engine.diff(&scan, &Selection::new(targets.iter().cloned()));

    for entry in entries {
        match entry.result {
            Ok(diff) => print_diff(&diff),
            Err(e) => eprintln!("{}: {}: {}", "error".red().bold(), entry.target, e),
        }
    }
    Ok(())
}

fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
