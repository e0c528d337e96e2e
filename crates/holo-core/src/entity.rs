//! Common interface for everything `holo apply` can work on
//!
//! Config files are one kind of entity; account and group entities provided
//! elsewhere implement the same trait so they can be selected and reported
//! uniformly.

use std::path::PathBuf;

use holo_fs::{logical_path, relative_from_logical};

use crate::report::TargetReport;

/// A configuration entity.
pub trait Entity {
    /// Unique identifier of the form `type:name`, e.g. `file:/etc/sudoers`.
    ///
    /// This is how the entity is addressed on the command line, so it must
    /// not contain whitespace or shell metacharacters.
    fn entity_id(&self) -> String;

    /// Paths of the files that define this entity.
    fn definition_files(&self) -> Vec<PathBuf>;

    /// Human-readable description of extra attributes, or an empty string.
    fn attributes(&self) -> String;

    /// Run the complete application algorithm for this entity.
    fn apply(&self, force: bool) -> TargetReport;
}

/// Sort entities by ID for stable listings.
pub fn sort_entities(entities: &mut [&dyn Entity]) {
    entities.sort_by_cached_key(|e| e.entity_id());
}

/// Which entities a command should act on.
///
/// An empty selection matches everything. Otherwise an entity matches if
/// its ID or, for files, its plain target path was named. File paths are
/// normalized, so `/etc//foo.conf` names `/etc/foo.conf`.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    names: Vec<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| normalize_name(n.into()))
                .collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether an entity with the given ID (and optional bare alias) is selected.
    pub fn matches(&self, entity_id: &str, alias: Option<&str>) -> bool {
        self.is_all()
            || self
                .names
                .iter()
                .any(|n| n == entity_id || Some(n.as_str()) == alias)
    }
}

fn normalize_name(name: String) -> String {
    let canonical = |path: &str| {
        relative_from_logical(path)
            .map(|rel| logical_path(&rel))
            .unwrap_or_else(|| path.to_string())
    };
    if let Some(path) = name.strip_prefix("file:") {
        format!("file:{}", canonical(path))
    } else if name.starts_with('/') {
        canonical(&name)
    } else {
        name
    }
}
