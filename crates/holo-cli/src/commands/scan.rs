//! Scan command implementation

use colored::Colorize;
use serde_json::json;

use holo_core::{Engine, ScanResult};

use crate::error::Result;

/// Run the scan command
pub fn run_scan(engine: &Engine, short: bool, json: bool) -> Result<()> {
    let scan = engine.scan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scan_json(&scan))?);
    } else if short {
        for file in &scan.files {
            println!("{}", file.logical_path());
        }
    } else {
        print_scan(&scan);
    }
    Ok(())
}

fn print_scan(scan: &ScanResult) {
    println!();
    for file in &scan.files {
        println!("{}", file.logical_path().bold());
        println!("    store at {}", file.backup_path().display());
        for layer in file.layers() {
            println!("    {:>8} {}", layer.strategy(), layer.path().display());
        }
        println!();
    }

    for orphan in &scan.orphans {
        let (strategy, assessment) = match orphan.assess() {
            Ok(a) => (a.strategy(), a.description().to_string()),
            Err(e) => ("error", e.to_string()),
        };
        println!("{} ({})", orphan.logical_path().bold(), assessment);
        println!("    {:>8} {}", strategy, orphan.backup_path().display());
        println!();
    }
}

fn scan_json(scan: &ScanResult) -> serde_json::Value {
    json!({
        "files": scan.files.iter().map(|f| json!({
            "target": f.logical_path(),
            "backup": f.backup_path(),
            "layers": f.layers(),
        })).collect::<Vec<_>>(),
        "orphans": scan.orphans.iter().map(|o| json!({
            "target": o.logical_path(),
            "backup": o.backup_path(),
            "assessment": o.assess().ok(),
        })).collect::<Vec<_>>(),
    })
}
