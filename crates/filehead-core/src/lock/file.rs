//! Lock ledger persisted as a TOML file
//!
//! All lock records live in one ledger document. Every access holds an
//! advisory `fs2` lock on a sidecar `<ledger>.lock` file: shared for reads,
//! exclusive for the load-modify-save cycle of a mutation. Saves go through
//! write-temp-then-rename so readers never see a half-written ledger.

use filehead_fs::ItemPath;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use super::{Lock, LockStore};
use crate::repository::Repository;
use crate::user::CurrentUser;
use crate::{Error, Result};

const LEDGER_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockLedger {
    /// Ledger format version for forward compatibility
    version: String,
    #[serde(default)]
    locks: Vec<Lock>,
}

impl Default for LockLedger {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION.to_string(),
            locks: Vec::new(),
        }
    }
}

/// Lock store backed by a TOML ledger on disk.
///
/// Locks survive process restarts and are visible to every process that
/// opens the same ledger path.
#[derive(Debug, Clone)]
pub struct FileLockStore {
    path: PathBuf,
}

impl FileLockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Open (creating if needed) the sidecar file that serializes access.
    fn open_guard(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| filehead_fs::Error::io(parent, e))?;
        }
        let guard = self.guard_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&guard)
            .map_err(|e| filehead_fs::Error::io(&guard, e).into())
    }

    fn load(&self) -> Result<LockLedger> {
        if !self.path.exists() {
            return Ok(LockLedger::default());
        }
        let content = filehead_fs::io::read_text(&self.path)?;
        let ledger: LockLedger = toml::from_str(&content).map_err(|e| Error::LockStore {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if ledger.version != LEDGER_VERSION {
            return Err(Error::LockStore {
                path: self.path.clone(),
                message: format!("unsupported ledger version {}", ledger.version),
            });
        }
        Ok(ledger)
    }

    fn save(&self, ledger: &LockLedger) -> Result<()> {
        let content = toml::to_string_pretty(ledger)?;
        filehead_fs::io::write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&LockLedger) -> T) -> Result<T> {
        let guard = self.open_guard()?;
        guard.lock_shared().map_err(|_| filehead_fs::Error::LockFailed {
            path: self.path.clone(),
        })?;
        let ledger = self.load()?;
        // Lock released when guard is dropped
        Ok(f(&ledger))
    }

    fn modify<T>(&self, f: impl FnOnce(&mut LockLedger) -> Result<(T, bool)>) -> Result<T> {
        let guard = self.open_guard()?;
        guard
            .lock_exclusive()
            .map_err(|_| filehead_fs::Error::LockFailed {
                path: self.path.clone(),
            })?;
        let mut ledger = self.load()?;
        let (value, changed) = f(&mut ledger)?;
        if changed {
            self.save(&ledger)?;
        }
        Ok(value)
    }
}

impl LockStore for FileLockStore {
    fn create(
        &self,
        repository: &Repository,
        user: &dyn CurrentUser,
        path: &ItemPath,
        message: &str,
    ) -> Result<Lock> {
        self.modify(|ledger| {
            if let Some(existing) = ledger
                .locks
                .iter()
                .find(|l| l.belongs_to(repository) && &l.path == path)
            {
                return Err(Error::ItemLocked {
                    path: path.clone(),
                    owner: existing.owner.clone(),
                });
            }
            let lock = Lock::new(repository, user.username(), path.clone(), message);
            ledger.locks.push(lock.clone());
            tracing::debug!(ledger = %self.path.display(), path = %path, "Recorded lock");
            Ok((lock, true))
        })
    }

    fn lookup(&self, repository: &Repository, path: &ItemPath) -> Result<Option<Lock>> {
        self.read(|ledger| {
            ledger
                .locks
                .iter()
                .find(|l| l.belongs_to(repository) && &l.path == path)
                .cloned()
        })
    }

    fn release(&self, lock: &Lock) -> Result<bool> {
        self.modify(|ledger| {
            let before = ledger.locks.len();
            ledger.locks.retain(|l| l.token != lock.token);
            let removed = ledger.locks.len() != before;
            Ok((removed, removed))
        })
    }

    fn list(&self, repository: &Repository) -> Result<Vec<Lock>> {
        self.read(|ledger| {
            let mut locks: Vec<Lock> = ledger
                .locks
                .iter()
                .filter(|l| l.belongs_to(repository))
                .cloned()
                .collect();
            locks.sort_by(|a, b| a.path.cmp(&b.path));
            locks
        })
    }
}
