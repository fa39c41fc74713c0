//! Backend resolution from configuration and command-line flags
//!
//! Flags win over the environment, which wins over the `--config` file,
//! which wins over the global config. With no root configured anywhere the
//! current directory is served.

use std::path::Path;

use filehead_core::{Backend, BackendConfig, ConfigResolver};

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Overrides the global configuration directory
const CONFIG_DIR_ENV: &str = "FILEHEAD_CONFIG_DIR";

/// Merge every configuration layer for this invocation.
pub fn resolve_config(global: &GlobalArgs, cwd: &Path) -> Result<BackendConfig> {
    let mut resolver = ConfigResolver::new();
    if let Some(ref config) = global.config {
        resolver = resolver.with_config_file(config);
    }
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        resolver = resolver.with_global_config_dir(dir);
    }
    let mut config = resolver.resolve()?;

    config.merge(&BackendConfig {
        root: global.root.clone(),
        user: global.user.clone(),
        ..Default::default()
    });
    if config.root.is_none() {
        tracing::debug!(cwd = %cwd.display(), "No root configured, using current directory");
        config.root = Some(cwd.to_path_buf());
    }
    Ok(config)
}

/// Open the backend this invocation operates on.
pub fn open_backend(global: &GlobalArgs) -> Result<Backend> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(global, &cwd)?;
    Ok(Backend::open(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config_file = temp.path().join("filehead.toml");
        std::fs::write(&config_file, "root = \"/srv/from-file\"\nuser = \"file-user\"\n").unwrap();

        let global = GlobalArgs {
            config: Some(config_file),
            user: Some("flag-user".into()),
            ..Default::default()
        };
        let config = resolve_config(&global, temp.path()).unwrap();

        assert_eq!(config.user.as_deref(), Some("flag-user"));
        // FILEHEAD_ROOT may be set by the environment running the tests
        if std::env::var_os("FILEHEAD_ROOT").is_none() {
            assert_eq!(config.root, Some(PathBuf::from("/srv/from-file")));
        }
    }

    #[test]
    fn test_root_flag_wins() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            root: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let config = resolve_config(&global, Path::new("/elsewhere")).unwrap();
        assert_eq!(config.root, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(temp.path().join("absent.toml")),
            ..Default::default()
        };
        assert!(resolve_config(&global, temp.path()).is_err());
    }
}
