//! Repository root and item identifiers

use filehead_fs::ItemPath;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name used when the root path has no final component (e.g. `/`).
const DEFAULT_NAME: &str = "repository";

/// Immutable identifier of a storage root.
///
/// Shared read-only by every component; cloning is cheap enough to hand a
/// copy to each `Item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    root: PathBuf,
    name: String,
}

impl Repository {
    /// Create a repository over `root` without touching the filesystem.
    ///
    /// The name defaults to the last component of the root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_NAME)
            .to_string();
        Self { root, name }
    }

    /// Create a repository with an explicit name.
    pub fn with_name(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// Open an existing directory as a repository.
    ///
    /// The root is canonicalized so ids and not-found reports never depend
    /// on how the caller spelled the path.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = dunce::canonicalize(root).map_err(|e| filehead_fs::Error::io(root, e))?;
        if !canonical.is_dir() {
            return Err(Error::config(format!(
                "repository root is not a directory: {}",
                canonical.display()
            )));
        }
        Ok(Self::new(canonical))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map a repository-relative path to its filesystem location.
    pub fn resolve(&self, path: &ItemPath) -> PathBuf {
        self.root.join(path.to_relative_native())
    }

    /// The root expressed as an item path, used to strip root prefixes
    /// from ids that carry an absolute location.
    pub fn root_as_item_path(&self) -> Option<ItemPath> {
        self.root.to_str().and_then(|s| ItemPath::new(s).ok())
    }

    /// Build an id for `path` in this repository.
    pub fn item_id(&self, path: ItemPath) -> ItemId {
        ItemId {
            repository: self.name.clone(),
            path,
        }
    }

    /// Parse `<name>:<path>` or a bare path into an id for this repository.
    pub fn parse_id(&self, raw: &str) -> Result<ItemId> {
        let path = raw
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(raw);
        Ok(self.item_id(ItemPath::new(path)?))
    }
}

/// Identifies one item: repository name plus repository-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    repository: String,
    path: ItemPath,
}

impl ItemId {
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The repository-relative path of this id.
    pub fn rel_path(&self) -> &ItemPath {
        &self.path
    }

    /// Id of the containing folder, `None` for the root.
    pub fn parent(&self) -> Option<ItemId> {
        self.path.parent().map(|path| ItemId {
            repository: self.repository.clone(),
            path,
        })
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository, self.path)
    }
}
