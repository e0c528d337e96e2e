//! Config file reconciliation engine for Holo
//!
//! For every target path defined in the repository this crate decides
//! whether it is safe to (re)write it, renders its content from the
//! repository layers, keeps a pristine backup for drift detection, absorbs
//! package manager side-cars and reports orphaned backups.
//!
//! # Architecture
//!
//! ```text
//!                     holo-cli
//!                         |
//!                      Engine
//!                         |
//!      +---------+--------+--------+---------+
//!      |         |        |        |         |
//!    scan     backup   integrity render    orphan
//!                         |
//!                      holo-fs
//! ```
//!
//! Three locations are in play for each target: the live file, its backup
//! below the backup root and one or more layers below the repository root.
//!
//! # Example
//!
//! ```ignore
//! use holo_core::{Engine, EngineConfig, Selection};
//!
//! let config = EngineConfig::load(None, Path::new("/"))?;
//! let engine = Engine::new(config);
//! let scan = engine.scan()?;
//! let batch = engine.apply(&scan, &Selection::all(), false);
//! ```

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod files;
pub mod report;

pub use config::{EngineConfig, Settings};
pub use engine::{DiffEntry, Engine};
pub use entity::{Entity, Selection, sort_entities};
pub use error::{Error, Result};
pub use files::{
    ConfigFile, OrphanAssessment, OrphanedBackup, RepositoryLayer, ScanResult, Strategy,
};
pub use report::{ApplyOutcome, BatchReport, Report, ReportLine, TargetReport};
