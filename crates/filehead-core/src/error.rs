//! Error types for filehead-core

use filehead_fs::ItemPath;
use std::path::PathBuf;

/// Result type for filehead-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filehead-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested item or parent does not exist
    #[error("Item not found in repository '{repository}': {path}")]
    ItemNotFound { repository: String, path: ItemPath },

    /// Lock acquisition conflicts with an existing lock
    #[error("Item {path} is already locked by {owner}")]
    ItemLocked { path: ItemPath, owner: String },

    /// Operation is invalid for the item kind or change type
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    /// A file modification targeted an item that is not on disk
    #[error("Could not find modified item: {path}")]
    ModifiedItemMissing { path: ItemPath },

    /// Removing a file or directory did not succeed
    #[error("Failed to delete local file {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller passed a value this backend did not issue
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Backend configuration is incomplete or inconsistent
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The lock ledger could not be read or written
    #[error("Lock store error at {path}: {message}")]
    LockStore { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from filehead-fs
    #[error(transparent)]
    Fs(#[from] filehead_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for errors that mean "nothing at that path".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. } | Self::ModifiedItemMissing { .. })
    }
}
