//! Naming conventions shared with the outside world.

use serde::{Deserialize, Serialize};

/// Suffix marking a repository file as a program that transforms the
/// previous layer's output instead of being copied verbatim.
pub const DEFAULT_SCRIPT_SUFFIX: &str = ".holoscript";

/// Default repository root on the final system.
pub const DEFAULT_REPO_DIR: &str = "/holo/repo";

/// Default backup root on the final system.
pub const DEFAULT_BACKUP_DIR: &str = "/holo/backup";

/// Default location of the engine configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/holo/holo.toml";

/// Kinds of files a package manager leaves next to a config file it could
/// not overwrite cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideCar {
    /// The package's new default was saved alongside; the target is untouched.
    NewDefault,
    /// The target was overwritten with the new default; the previous target
    /// was saved alongside.
    OldSaved,
}

/// Distribution package manager whose side-car conventions are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Pacman,
    Dpkg,
    Rpm,
}

impl PackageManager {
    /// The suffix appended to a target path for the given side-car kind.
    pub fn suffix(&self, kind: SideCar) -> &'static str {
        match (self, kind) {
            (Self::Pacman, SideCar::NewDefault) => ".pacnew",
            (Self::Pacman, SideCar::OldSaved) => ".pacsave",
            (Self::Dpkg, SideCar::NewDefault) => ".dpkg-dist",
            (Self::Dpkg, SideCar::OldSaved) => ".dpkg-old",
            (Self::Rpm, SideCar::NewDefault) => ".rpmnew",
            (Self::Rpm, SideCar::OldSaved) => ".rpmsave",
        }
    }

    /// Side-car kinds in the order they are looked for.
    pub fn side_cars(&self) -> [(SideCar, &'static str); 2] {
        [
            (SideCar::NewDefault, self.suffix(SideCar::NewDefault)),
            (SideCar::OldSaved, self.suffix(SideCar::OldSaved)),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Dpkg => "dpkg",
            Self::Rpm => "rpm",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
