//! Applying patchsets and managing locks
//!
//! A commit is a single pass over the patchset. There is no transaction:
//! when a record fails, records before it stay applied on disk and records
//! after it are never attempted. Lock records are not consulted while
//! applying; acquiring them first is the caller's job.

use filehead_fs::ItemPath;
use std::sync::Arc;

use crate::item::Item;
use crate::lock::{Lock, LockCollection, LockStore};
use crate::patch::{PatchItem, Patchset};
use crate::repository::Repository;
use crate::revision::Revision;
use crate::user::CurrentUser;
use crate::{Error, Result};

/// Writes patchsets to the repository and acquires/releases locks.
#[derive(Debug, Clone)]
pub struct Commit {
    repository: Repository,
    user: Arc<dyn CurrentUser>,
    locks: Arc<dyn LockStore>,
}

impl Commit {
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

    /// Apply every record in order and mint a revision for the result.
    ///
    /// # Errors
    ///
    /// The first failing record's error. Earlier records remain applied.
    pub fn run(&self, patchset: Patchset) -> Result<Revision> {
        let base = patchset.base_revision();
        let total = patchset.len();
        tracing::info!(
            repository = %self.repository.name(),
            records = total,
            base = %base,
            message = patchset.message().unwrap_or(""),
            "Applying patchset"
        );

        for (index, change) in patchset.into_iter().enumerate() {
            tracing::debug!(index, kind = %change.kind(), path = %change.path(), "Applying change");
            self.apply(change, base).inspect_err(|e| {
                tracing::warn!(index, total, error = %e, "Patchset aborted; earlier changes remain applied");
            })?;
        }

        let revision = Revision::now();
        tracing::info!(revision = %revision, "Patchset applied");
        Ok(revision)
    }

    fn apply(&self, change: PatchItem, base: Revision) -> Result<()> {
        let kind = change.kind();
        let item = self.item(change.path().clone(), base);
        match change {
            PatchItem::FileAdd { mut content, .. } => item.write_contents(&mut content),
            PatchItem::FileModification { path, mut content } => {
                if !item.exists() {
                    return Err(Error::ModifiedItemMissing { path });
                }
                item.write_contents(&mut content)
            }
            PatchItem::FileDelete { .. } | PatchItem::FolderDelete { .. } => item.delete(),
            PatchItem::FolderAdd { .. } => item.mkdir(),
            PatchItem::FileCopy { .. } | PatchItem::FileMove { .. } => Err(Error::unsupported(
                format!("Filesystem modification not supported for change type {kind}"),
            )),
        }
    }

    fn item(&self, path: ItemPath, revision: Revision) -> Item {
        Item::new(
            self.repository.clone(),
            Arc::clone(&self.user),
            path,
            revision,
        )
    }

    /// Lock each path for the acting user.
    ///
    /// If any path is already locked, locks taken earlier in this call are
    /// released again and `ItemLocked` is returned.
    pub fn lock(&self, message: &str, base: &Revision, paths: &[ItemPath]) -> Result<LockCollection> {
        let mut collection = LockCollection::new(&self.repository);
        for path in paths {
            match self
                .locks
                .create(&self.repository, self.user.as_ref(), path, message)
            {
                Ok(lock) => collection.push(lock),
                Err(e) => {
                    for acquired in collection.iter() {
                        if let Err(release_err) = self.locks.release(acquired) {
                            tracing::warn!(path = %acquired.path, error = %release_err, "Failed to release partial lock");
                        }
                    }
                    return Err(e);
                }
            }
        }
        tracing::info!(count = collection.len(), base = %base, "Locked paths");
        Ok(collection)
    }

    /// Release locks previously issued for this repository.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a lock that belongs to another repository; no
    /// lock is released in that case.
    pub fn unlock(&self, locks: &[Lock]) -> Result<()> {
        if let Some(foreign) = locks.iter().find(|l| !l.belongs_to(&self.repository)) {
            return Err(Error::invalid_argument(format!(
                "Lock on {} was issued for repository '{}' at {}, not '{}' at {}",
                foreign.path,
                foreign.repository,
                foreign.root.display(),
                self.repository.name(),
                self.repository.root().display()
            )));
        }
        for lock in locks {
            if !self.locks.release(lock)? {
                tracing::warn!(path = %lock.path, token = %lock.token, "Lock was not held");
            }
        }
        Ok(())
    }
}
