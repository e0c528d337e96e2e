//! Command implementations for holo-cli

pub mod apply;
pub mod diff;
pub mod scan;

use std::path::Path;

use tracing::debug;

use holo_core::{Engine, EngineConfig};

use crate::error::Result;

pub use apply::run_apply;
pub use diff::run_diff;
pub use scan::run_scan;

/// Build the engine for the system below `root`.
pub fn load_engine(root: &Path, config_file: Option<&Path>) -> Result<Engine> {
    let config = EngineConfig::load(config_file, root)?;
    debug!(
        repo = %config.roots().repo().display(),
        backup = %config.roots().backup().display(),
        package_manager = %config.package_manager(),
        "configuration loaded"
    );
    Ok(Engine::new(config))
}

pub fn run_version() {
    println!("holo v{}", env!("CARGO_PKG_VERSION"));
}
