//! Error types for holo-fs

use std::path::PathBuf;

/// Result type for holo-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in holo-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("{path} is not a regular file or symlink")]
    NotManageable { path: PathBuf },

    #[error("{path} is not below {base}")]
    OutsideRoot { path: PathBuf, base: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: Error) -> Self {
        Self::Copy {
            from: from.into(),
            to: to.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is a plain "file does not exist" I/O failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Self::Copy { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
