//! Holo CLI
//!
//! Applies the files of the holo repository to the system and reports on
//! what it did.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let engine = || commands::load_engine(&cli.root, cli.config.as_deref());
    match cli.command {
        Commands::Apply {
            force,
            json,
            targets,
        } => commands::run_apply(&engine()?, &targets, force, json),
        Commands::Diff { targets } => commands::run_diff(&engine()?, &targets),
        Commands::Scan { short, json } => commands::run_scan(&engine()?, short, json),
        Commands::Version => {
            commands::run_version();
            Ok(())
        }
    }
}
