//! Backend configuration and its resolution
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged from these sources (later sources override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/filehead/config.toml`
//! 2. **Explicit file** - a file named by the caller (TOML, JSON or YAML)
//! 3. **Environment** - `FILEHEAD_ROOT`, `FILEHEAD_NAME`, `FILEHEAD_USER`, `FILEHEAD_LOCKS`
//!
//! Command-line flags are applied on top by the CLI with [`BackendConfig::merge`].
//!
//! # Example
//!
//! ```toml
//! root = "/srv/content/site"
//! user = "publisher"
//!
//! [locks]
//! store = "file"
//! path = "/var/lib/filehead/site-locks.toml"
//! ```

mod resolver;

pub use resolver::ConfigResolver;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where lock records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStoreKind {
    /// TOML ledger on disk, shared between processes
    File,
    /// Process-local, lost on exit
    Memory,
}

/// `[locks]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<LockStoreKind>,

    /// Ledger location for the file store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Settings needed to open a [`Backend`](crate::Backend).
///
/// Every field is optional so partial layers can be merged; unset fields
/// fall back to defaults when the backend is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Directory served as the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Repository name; defaults to the last component of `root`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Acting user; defaults to the operating system login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default)]
    pub locks: LockSettings,
}

impl BackendConfig {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: &BackendConfig) {
        if other.root.is_some() {
            self.root = other.root.clone();
        }
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.user.is_some() {
            self.user = other.user.clone();
        }
        if other.locks.store.is_some() {
            self.locks.store = other.locks.store;
        }
        if other.locks.path.is_some() {
            self.locks.path = other.locks.path.clone();
        }
    }

    pub fn lock_store_kind(&self) -> LockStoreKind {
        self.locks.store.unwrap_or(LockStoreKind::File)
    }
}
