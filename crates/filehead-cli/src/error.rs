//! Errors reported by the `filehead` binary
//!
//! Repository and path failures pass through with their own messages;
//! everything the CLI itself rejects is a [`CliError::Usage`].

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Lookup, commit, lock or configuration failure
    #[error(transparent)]
    Repository(#[from] filehead_core::Error),

    /// A path argument that is not a valid item path, or a filesystem
    /// failure below the repository layer
    #[error(transparent)]
    Fs(#[from] filehead_fs::Error),

    /// Writing command output or reading a manifest source
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Rendering `--json` output
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Invalid patch manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    /// Arguments that parse but make no sense for the repository, such as
    /// unlocking a path nobody holds
    #[error("{message}")]
    Usage { message: String },
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}
