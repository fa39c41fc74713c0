//! Resolving ids to items and walking the item tree

use filehead_fs::ItemPath;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use crate::item::{Item, ItemKind};
use crate::lock::{Lock, LockStore};
use crate::repository::{ItemId, Repository};
use crate::revision::Revision;
use crate::user::CurrentUser;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemFilter {
    Both,
    Files,
    Folders,
}

impl ItemFilter {
    fn accepts(self, kind: ItemKind) -> bool {
        match self {
            Self::Both => true,
            Self::Files => kind == ItemKind::File,
            Self::Folders => kind == ItemKind::Folder,
        }
    }
}

/// Read-side queries over the repository tree.
///
/// Every query builds fresh [`Item`]s bound to this lookup's user and
/// revision context; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ItemLookup {
    repository: Repository,
    user: Arc<dyn CurrentUser>,
    revision: Revision,
    locks: Arc<dyn LockStore>,
}

impl ItemLookup {
    pub fn new(
        repository: Repository,
        user: Arc<dyn CurrentUser>,
        revision: Revision,
        locks: Arc<dyn LockStore>,
    ) -> Self {
        Self {
            repository,
            user,
            revision,
            locks,
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Resolve an id to its item.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if nothing exists at the id's path.
    pub fn get_item(&self, id: &ItemId) -> Result<Item> {
        let path = id.rel_path();
        let item = self.item(path.clone());
        if !item.exists() {
            tracing::debug!(path = %path, "Item not found");
            return Err(self.not_found(path));
        }
        Ok(item)
    }

    /// Ids of the folders directly inside `parent`.
    pub fn immediate_folders(&self, parent: &ItemId) -> Result<Vec<ItemId>> {
        let parent = self.get_item(parent)?;
        Ok(ids_of(filtered_children(&parent, ItemFilter::Folders)?))
    }

    /// Ids of the files directly inside `parent`.
    pub fn immediate_files(&self, parent: &ItemId) -> Result<Vec<ItemId>> {
        let parent = self.get_item(parent)?;
        Ok(ids_of(filtered_children(&parent, ItemFilter::Files)?))
    }

    /// Every item directly inside `parent`.
    pub fn immediates(&self, parent: &ItemId) -> Result<Vec<Item>> {
        let parent = self.get_item(parent)?;
        filtered_children(&parent, ItemFilter::Both)
    }

    /// Ids of everything beneath `parent`, at any depth.
    ///
    /// Pre-order by level: a folder's immediate children are all listed
    /// before any of its subfolders is entered, and subfolders are entered
    /// in listing order. Folders reached through symbolic links are
    /// followed, except a link back to one of its own ancestors, which is
    /// listed but not entered.
    pub fn descendants(&self, parent: &ItemId) -> Result<Vec<ItemId>> {
        let root = self.get_item(parent)?;
        let mut descendants = Vec::new();

        // Each pending folder carries the canonical directories above it
        let mut stack: Vec<(Item, Rc<Ancestors>)> = vec![(root, Rc::new(Ancestors::Top))];
        while let Some((folder, ancestors)) = stack.pop() {
            let real = folder.filesystem_path();
            let real = dunce::canonicalize(&real).map_err(|e| filehead_fs::Error::io(&real, e))?;
            if ancestors.contains(&real) {
                tracing::debug!(path = %folder.path(), "Not entering link back to an ancestor");
                continue;
            }
            let chain = Rc::new(Ancestors::Dir(real, ancestors));

            let children = filtered_children(&folder, ItemFilter::Both)?;
            let mut subfolders = Vec::new();
            for child in children {
                descendants.push(child.id());
                if ItemFilter::Folders.accepts(child.kind()) {
                    subfolders.push((child, Rc::clone(&chain)));
                }
            }
            // Reversed so the first subfolder is popped next
            stack.extend(subfolders.into_iter().rev());
        }

        tracing::debug!(parent = %parent, count = descendants.len(), "Collected descendants");
        Ok(descendants)
    }

    /// The lock held on the id's path, if any.
    pub fn locked(&self, id: &ItemId) -> Result<Option<Lock>> {
        self.locks.lookup(&self.repository, id.rel_path())
    }

    fn item(&self, path: ItemPath) -> Item {
        Item::new(
            self.repository.clone(),
            Arc::clone(&self.user),
            path,
            self.revision,
        )
    }

    /// Not-found error reporting the path relative to the repository root,
    /// stripping the root prefix if the caller passed an absolute location.
    fn not_found(&self, path: &ItemPath) -> Error {
        let reported = self
            .repository
            .root_as_item_path()
            .filter(|root| !root.is_root())
            .and_then(|root| path.strip_prefix(&root))
            .unwrap_or_else(|| path.clone());
        Error::ItemNotFound {
            repository: self.repository.name().to_string(),
            path: reported,
        }
    }
}

/// Canonical directories from the walk's starting folder down to the
/// current one, shared between siblings.
#[derive(Debug)]
enum Ancestors {
    Top,
    Dir(PathBuf, Rc<Ancestors>),
}

impl Ancestors {
    fn contains(&self, dir: &Path) -> bool {
        let mut current = self;
        while let Ancestors::Dir(path, parent) = current {
            if path == dir {
                return true;
            }
            current = parent.as_ref();
        }
        false
    }
}

fn filtered_children(parent: &Item, filter: ItemFilter) -> Result<Vec<Item>> {
    Ok(parent
        .children()?
        .into_iter()
        .filter(|child| filter.accepts(child.kind()))
        .collect())
}

fn ids_of(items: Vec<Item>) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.id())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::MemoryLockStore;
    use crate::user::StaticUser;
    use std::fs;
    use tempfile::TempDir;

    fn lookup(temp: &TempDir) -> ItemLookup {
        ItemLookup::new(
            Repository::new(temp.path()),
            Arc::new(StaticUser::new("alice")),
            Revision::now(),
            Arc::new(MemoryLockStore::new()),
        )
    }

    #[test]
    fn not_found_strips_repository_root_prefix() {
        let temp = TempDir::new().unwrap();
        let lookup = lookup(&temp);
        let absolute = format!("{}/docs/missing.txt", temp.path().display());
        let id = lookup.repository.parse_id(&absolute).unwrap();

        match lookup.get_item(&id) {
            Err(Error::ItemNotFound { path, .. }) => {
                assert_eq!(path.as_str(), "/docs/missing.txt");
            }
            other => panic!("expected ItemNotFound, got {:?}", other),
        }
    }

    #[test]
    fn not_found_keeps_relative_path() {
        let temp = TempDir::new().unwrap();
        let lookup = lookup(&temp);
        let id = lookup.repository.parse_id("docs/missing.txt").unwrap();

        let err = lookup.get_item(&id).unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { path, .. } if path.as_str() == "/docs/missing.txt"));
    }

    #[test]
    fn immediates_of_a_file_are_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let lookup = lookup(&temp);
        let id = lookup.repository.parse_id("a.txt").unwrap();

        assert!(lookup.immediates(&id).unwrap().is_empty());
        assert!(lookup.descendants(&id).unwrap().is_empty());
    }
}
