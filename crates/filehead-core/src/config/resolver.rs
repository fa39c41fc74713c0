//! Configuration resolution with layered overrides

use filehead_fs::ConfigStore;
use std::path::PathBuf;

use super::{BackendConfig, LockStoreKind};
use crate::{Error, Result};

/// Resolves a [`BackendConfig`] by merging several sources.
///
/// Missing optional layers are silently skipped. Invalid content in any
/// layer is an error.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// File named explicitly by the caller; must exist when set
    config_file: Option<PathBuf>,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also load `path` after the global layer.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use a custom global config directory instead of the platform one.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("filehead"))
    }

    /// Resolve using the process environment for the environment layer.
    pub fn resolve(&self) -> Result<BackendConfig> {
        self.resolve_with_env(|key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with_env(&self, env: impl Fn(&str) -> Option<String>) -> Result<BackendConfig> {
        let store = ConfigStore::new();
        let mut config = BackendConfig::default();

        // Layer 1 - Global defaults
        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config (layer 1)");
                let global: BackendConfig = store.load(&global_config_path)?;
                config.merge(&global);
            } else {
                tracing::debug!(?global_config_path, "No global config found (layer 1), skipping");
            }
        }

        // Layer 2 - Explicit file
        if let Some(ref path) = self.config_file {
            if !path.is_file() {
                return Err(Error::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(?path, "Loading config file (layer 2)");
            let explicit: BackendConfig = store.load(path)?;
            config.merge(&explicit);
        }

        // Layer 3 - Environment
        let mut from_env = BackendConfig {
            root: env("FILEHEAD_ROOT").map(PathBuf::from),
            name: env("FILEHEAD_NAME"),
            user: env("FILEHEAD_USER"),
            ..Default::default()
        };
        if let Some(locks) = env("FILEHEAD_LOCKS") {
            if locks.eq_ignore_ascii_case("memory") {
                from_env.locks.store = Some(LockStoreKind::Memory);
            } else {
                from_env.locks.store = Some(LockStoreKind::File);
                from_env.locks.path = Some(PathBuf::from(locks));
            }
        }
        config.merge(&from_env);

        Ok(config)
    }
}
