//! Filesystem primitives for Holo
//!
//! Provides the path roots shared by every engine component, the metadata
//! copier used as the only mutation primitive for managed files, and
//! configuration file loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod metadata;
pub mod path;

pub use config::ConfigStore;
pub use constants::{PackageManager, SideCar, DEFAULT_SCRIPT_SUFFIX};
pub use error::{Error, Result};
pub use metadata::{
    FileKind, copy_file, copy_metadata, file_kind, is_manageable, is_newer_than,
    write_with_metadata,
};
pub use path::{Roots, logical_path, relative_from_logical, relative_path};
