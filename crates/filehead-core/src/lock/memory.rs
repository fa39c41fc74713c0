//! Process-local lock store

use filehead_fs::ItemPath;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{Lock, LockStore};
use crate::repository::Repository;
use crate::user::CurrentUser;
use crate::{Error, Result};

/// Keeps lock records in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryLockStore {
    /// Keyed by repository root and path
    locks: Mutex<BTreeMap<(PathBuf, ItemPath), Lock>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockStore for MemoryLockStore {
    fn create(
        &self,
        repository: &Repository,
        user: &dyn CurrentUser,
        path: &ItemPath,
        message: &str,
    ) -> Result<Lock> {
        let key = (repository.root().to_path_buf(), path.clone());
        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(&key) {
            return Err(Error::ItemLocked {
                path: path.clone(),
                owner: existing.owner.clone(),
            });
        }
        let lock = Lock::new(repository, user.username(), path.clone(), message);
        locks.insert(key, lock.clone());
        Ok(lock)
    }

    fn lookup(&self, repository: &Repository, path: &ItemPath) -> Result<Option<Lock>> {
        let key = (repository.root().to_path_buf(), path.clone());
        Ok(self.locks.lock().get(&key).cloned())
    }

    fn release(&self, lock: &Lock) -> Result<bool> {
        let key = (lock.root.clone(), lock.path.clone());
        let mut locks = self.locks.lock();
        match locks.get(&key) {
            Some(held) if held.token == lock.token => {
                locks.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list(&self, repository: &Repository) -> Result<Vec<Lock>> {
        Ok(self
            .locks
            .lock()
            .values()
            .filter(|lock| lock.belongs_to(repository))
            .cloned()
            .collect())
    }
}
