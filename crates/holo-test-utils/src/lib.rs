//! Shared test utilities for the holo workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`root`] — [`TestRoot`] builder for a throwaway target root with
//!   repository and backup trees below it

pub mod root;

pub use root::TestRoot;
