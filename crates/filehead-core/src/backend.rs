//! Opening a configured backend
//!
//! [`Backend`] bundles the repository, the acting user and the lock store
//! and hands out [`ItemLookup`] and [`Commit`] services that share them.

use filehead_fs::checksum;
use std::path::PathBuf;
use std::sync::Arc;

use crate::commit::Commit;
use crate::config::{BackendConfig, LockStoreKind};
use crate::lock::{FileLockStore, LockStore, MemoryLockStore};
use crate::lookup::ItemLookup;
use crate::repository::Repository;
use crate::revision::Revision;
use crate::user::{CurrentUser, StaticUser, SystemUser};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Backend {
    repository: Repository,
    user: Arc<dyn CurrentUser>,
    locks: Arc<dyn LockStore>,
}

impl Backend {
    pub fn new(
        repository: Repository,
        user: Arc<dyn CurrentUser>,
        locks: Arc<dyn LockStore>,
    ) -> Self {
        Self {
            repository,
            user,
            locks,
        }
    }

    /// Build a backend from resolved configuration.
    ///
    /// # Errors
    ///
    /// `Config` if no root is configured, the root is not a directory, no
    /// ledger location can be determined, or the ledger would live inside
    /// the repository tree (where it would show up as an item).
    pub fn open(config: &BackendConfig) -> Result<Self> {
        let root = config
            .root
            .as_ref()
            .ok_or_else(|| Error::config("no repository root configured"))?;
        let mut repository = Repository::open(root)?;
        if let Some(ref name) = config.name {
            repository = Repository::with_name(repository.root(), name.clone());
        }

        let user: Arc<dyn CurrentUser> = match config.user {
            Some(ref name) => Arc::new(StaticUser::new(name.clone())),
            None => Arc::new(SystemUser),
        };

        let locks: Arc<dyn LockStore> = match config.lock_store_kind() {
            LockStoreKind::Memory => Arc::new(MemoryLockStore::new()),
            LockStoreKind::File => {
                let ledger = match config.locks.path {
                    Some(ref path) => path.clone(),
                    None => default_ledger_path(&repository)?,
                };
                let absolute = std::path::absolute(&ledger)
                    .map_err(|e| filehead_fs::Error::io(&ledger, e))?;
                if absolute.starts_with(repository.root()) {
                    return Err(Error::config(format!(
                        "lock ledger {} must live outside the repository root {}",
                        absolute.display(),
                        repository.root().display()
                    )));
                }
                Arc::new(FileLockStore::new(absolute))
            }
        };

        tracing::debug!(
            repository = %repository.name(),
            root = %repository.root().display(),
            user = %user.username(),
            "Opened backend"
        );
        Ok(Self::new(repository, user, locks))
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn user(&self) -> &Arc<dyn CurrentUser> {
        &self.user
    }

    pub fn lock_store(&self) -> &Arc<dyn LockStore> {
        &self.locks
    }

    /// Lookup service reporting `revision` as the current revision.
    pub fn lookup(&self, revision: Revision) -> ItemLookup {
        ItemLookup::new(
            self.repository.clone(),
            Arc::clone(&self.user),
            revision,
            Arc::clone(&self.locks),
        )
    }

    pub fn commit(&self) -> Commit {
        Commit::new(
            self.repository.clone(),
            Arc::clone(&self.user),
            Arc::clone(&self.locks),
        )
    }
}

/// `<data_local_dir>/filehead/locks/<ledger_file_name>`
fn default_ledger_path(repository: &Repository) -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| Error::config("no data directory available for the lock ledger"))?;
    Ok(data_dir
        .join("filehead")
        .join("locks")
        .join(ledger_file_name(repository)))
}

/// `<name>-<first 8 hex digits of the root's MD5>.toml`
///
/// The root digest keeps repositories that share a name apart.
fn ledger_file_name(repository: &Repository) -> String {
    let root = repository.root().as_os_str().as_encoded_bytes();
    let digest = checksum::compute_content_checksum(root);
    format!("{}-{}.toml", repository.name(), &digest.md5()[..8])
}
