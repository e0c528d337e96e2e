//! Error types for holo-core

use std::path::PathBuf;

/// Result type for holo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in holo-core operations
///
/// Scan errors abort a whole run before anything is written. All other
/// variants are confined to a single target and end up in its report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Repository root does not exist
    #[error("Cannot open {path}: no such directory")]
    RepositoryMissing { path: PathBuf },

    /// Repository root exists but is something else
    #[error("Cannot open {path}: not a directory")]
    NotADirectory { path: PathBuf },

    /// A repository or backup subtree could not be read
    #[error("Cannot scan {path}: {message}")]
    ScanFailed { path: PathBuf, message: String },

    /// Target is neither a regular file nor a symlink
    #[error("{path} is not a regular file")]
    NotManageable { path: PathBuf },

    /// Target was changed since the engine last wrote it
    #[error("{path} has been modified by user (use --force to overwrite)")]
    UserModified { path: PathBuf },

    /// A repository script could not be started
    #[error("Cannot execute {program}: {source}")]
    ProgramSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A repository script ran but failed
    #[error("{program} failed with {status}{}", stderr_suffix(.stderr))]
    ProgramFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// Target does not correspond to any managed file or orphan
    #[error("{target} is not managed by holo")]
    UnknownTarget { target: String },

    /// Engine configuration is invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from holo-fs
    #[error(transparent)]
    Fs(#[from] holo_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl Error {
    /// Whether this error aborts the whole run rather than one target.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RepositoryMissing { .. }
                | Self::NotADirectory { .. }
                | Self::ScanFailed { .. }
                | Self::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_failed_includes_stderr() {
        let err = Error::ProgramFailed {
            program: PathBuf::from("/holo/repo/etc/foo.conf.holoscript"),
            status: "exit status: 3".into(),
            stderr: "sed: no input\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "/holo/repo/etc/foo.conf.holoscript failed with exit status: 3: sed: no input"
        );
    }

    #[test]
    fn program_failed_without_stderr() {
        let err = Error::ProgramFailed {
            program: PathBuf::from("script"),
            status: "exit status: 1".into(),
            stderr: "  \n".into(),
        };
        assert_eq!(err.to_string(), "script failed with exit status: 1");
    }

    #[test]
    fn scan_errors_are_fatal() {
        assert!(Error::RepositoryMissing { path: "/holo/repo".into() }.is_fatal());
        assert!(!Error::UserModified { path: "/etc/foo".into() }.is_fatal());
    }
}
