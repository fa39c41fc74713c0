//! Advisory path locks
//!
//! A lock is a logical record claiming exclusivity over one path. Nothing on
//! the content tree is locked; writers are expected to acquire a lock before
//! committing and release it afterward. How records are persisted is up to
//! the [`LockStore`] in use.

mod file;
mod memory;

pub use file::FileLockStore;
pub use memory::MemoryLockStore;

use chrono::{DateTime, Utc};
use filehead_fs::ItemPath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::Result;
use crate::repository::Repository;
use crate::user::CurrentUser;

/// A lock held on one path of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Unique token identifying this lock instance
    pub token: Uuid,
    /// Name of the repository the path belongs to, for display
    pub repository: String,
    /// Root directory of that repository; decides ownership
    pub root: PathBuf,
    pub path: ItemPath,
    pub message: String,
    /// User that acquired the lock
    pub owner: String,
    pub created: DateTime<Utc>,
}

impl Lock {
    /// Create a lock record with a fresh token and the current time.
    pub fn new(
        repository: &Repository,
        owner: impl Into<String>,
        path: ItemPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            token: Uuid::new_v4(),
            repository: repository.name().to_string(),
            root: repository.root().to_path_buf(),
            path,
            message: message.into(),
            owner: owner.into(),
            created: Utc::now(),
        }
    }

    /// Locks are scoped by repository root, not by name: two roots that
    /// share a name never see each other's locks.
    pub fn belongs_to(&self, repository: &Repository) -> bool {
        self.root == repository.root()
    }
}

/// Locks acquired together for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockCollection {
    repository: String,
    root: PathBuf,
    locks: Vec<Lock>,
}

impl LockCollection {
    pub fn new(repository: &Repository) -> Self {
        Self {
            repository: repository.name().to_string(),
            root: repository.root().to_path_buf(),
            locks: Vec::new(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn push(&mut self, lock: Lock) {
        debug_assert_eq!(lock.root, self.root);
        self.locks.push(lock);
    }

    pub fn locks(&self) -> &[Lock] {
        &self.locks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lock> {
        self.locks.iter()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl IntoIterator for LockCollection {
    type Item = Lock;
    type IntoIter = std::vec::IntoIter<Lock>;

    fn into_iter(self) -> Self::IntoIter {
        self.locks.into_iter()
    }
}

impl<'a> IntoIterator for &'a LockCollection {
    type Item = &'a Lock;
    type IntoIter = std::slice::Iter<'a, Lock>;

    fn into_iter(self) -> Self::IntoIter {
        self.locks.iter()
    }
}

/// Persistence for lock records.
///
/// At most one lock exists per (repository root, path). Implementations must be
/// safe to share between the commit and lookup services.
pub trait LockStore: Send + Sync + std::fmt::Debug {
    /// Record a new lock for `path` owned by `user`.
    ///
    /// # Errors
    ///
    /// `ItemLocked` if the path already carries a lock.
    fn create(
        &self,
        repository: &Repository,
        user: &dyn CurrentUser,
        path: &ItemPath,
        message: &str,
    ) -> Result<Lock>;

    /// The lock currently held on `path`, if any.
    fn lookup(&self, repository: &Repository, path: &ItemPath) -> Result<Option<Lock>>;

    /// Release a lock. Returns `false` if no lock with that token was held.
    fn release(&self, lock: &Lock) -> Result<bool>;

    /// Every lock held in `repository`, ordered by path.
    fn list(&self, repository: &Repository) -> Result<Vec<Lock>>;
}
