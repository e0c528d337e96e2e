//! Config file entities
//!
//! Each managed target has three locations in play: the live target, its
//! pristine backup and one or more repository layers. The submodules cover
//! discovery, rendering, application and orphan handling for them.

pub mod apply;
pub mod backup;
pub mod config_file;
pub mod diff;
pub mod integrity;
pub mod layer;
pub mod orphan;
pub mod render;
pub mod scan;

pub use config_file::ConfigFile;
pub use diff::{diff_config_file, diff_orphan, unified_diff};
pub use layer::{RepositoryLayer, Strategy};
pub use orphan::{OrphanAssessment, OrphanedBackup};
pub use render::{Rendered, render};
pub use scan::{ScanResult, scan_repo};
