//! Error types for holo-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
///
/// Only errors that end the whole run end up here. Failures of a single
/// target are part of its report.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from holo-core
    #[error(transparent)]
    Core(#[from] holo_core::Error),

    /// JSON output error
    #[error("Cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
