//! Repository items backed by plain filesystem entries
//!
//! An [`Item`] is a transient view of one path. Every attribute is read from
//! the filesystem when asked for; nothing is cached, so two calls may see
//! different answers if the tree changed in between.

use filehead_fs::{Checksum, ItemPath, checksum, io};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{ItemId, Repository};
use crate::revision::Revision;
use crate::user::CurrentUser;
use crate::{Error, Result};

/// Whether an item is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    File,
    Folder,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// A file or folder in the repository.
///
/// Bound at construction to a repository, the acting user, a path and the
/// revision context the caller considers current. The changed-revision and
/// changed-author attributes report that context, not anything stored on
/// disk.
#[derive(Debug, Clone)]
pub struct Item {
    repository: Repository,
    user: Arc<dyn CurrentUser>,
    path: ItemPath,
    revision: Revision,
}

impl Item {
    pub fn new(
        repository: Repository,
        user: Arc<dyn CurrentUser>,
        path: ItemPath,
        revision: Revision,
    ) -> Self {
        Self {
            repository,
            user,
            path,
            revision,
        }
    }

    pub fn id(&self) -> ItemId {
        self.repository.item_id(self.path.clone())
    }

    pub fn path(&self) -> &ItemPath {
        &self.path
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Where this item lives on disk.
    pub fn filesystem_path(&self) -> PathBuf {
        self.repository.resolve(&self.path)
    }

    pub fn revision_changed(&self) -> Revision {
        self.revision
    }

    pub fn revision_changed_author(&self) -> String {
        self.user.username()
    }

    /// True iff the bound path currently names a filesystem entry.
    pub fn exists(&self) -> bool {
        self.filesystem_path().exists()
    }

    /// `Folder` iff the bound path is a directory, `File` otherwise.
    ///
    /// A path that does not exist reports `File`.
    pub fn kind(&self) -> ItemKind {
        if self.filesystem_path().is_dir() {
            ItemKind::Folder
        } else {
            ItemKind::File
        }
    }

    /// One item per directory entry, sorted by name.
    ///
    /// Files have no children. Names are used verbatim as path segments;
    /// entries an [`ItemPath`] cannot address (names that are not valid
    /// UTF-8) are skipped with a warning.
    pub fn children(&self) -> Result<Vec<Item>> {
        if self.kind() != ItemKind::Folder {
            return Ok(Vec::new());
        }

        let dir = self.filesystem_path();
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| filehead_fs::Error::io(&dir, e))? {
            let entry = entry.map_err(|e| filehead_fs::Error::io(&dir, e))?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(parent = %self.path, name = ?raw, "Skipping non UTF-8 entry");
                }
            }
        }
        names.sort();

        let mut children = Vec::with_capacity(names.len());
        for name in &names {
            match self.path.append(name) {
                Ok(path) => children.push(self.child(path)),
                Err(e) => {
                    tracing::warn!(parent = %self.path, error = %e, "Skipping unaddressable entry");
                }
            }
        }
        Ok(children)
    }

    fn child(&self, path: ItemPath) -> Item {
        Item {
            repository: self.repository.clone(),
            user: Arc::clone(&self.user),
            path,
            revision: self.revision,
        }
    }

    /// MD5 of the file content.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for folders; an I/O error if the file cannot
    /// be opened or read.
    pub fn checksum(&self) -> Result<Checksum> {
        if self.kind() == ItemKind::Folder {
            return Err(Error::unsupported(format!(
                "Cannot checksum the folder: {}",
                self.path
            )));
        }
        Ok(checksum::compute_file_checksum(&self.filesystem_path())?)
    }

    /// Byte length of the file, 0 for folders and for missing files.
    pub fn size(&self) -> u64 {
        if self.kind() == ItemKind::Folder {
            return 0;
        }
        fs::metadata(self.filesystem_path())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Stream the full file content into `sink`.
    pub fn contents(&self, sink: &mut dyn Write) -> Result<()> {
        if self.kind() == ItemKind::Folder {
            return Err(Error::unsupported(format!(
                "Cannot get data stream from folder: {}",
                self.path
            )));
        }
        io::copy_file_into(&self.filesystem_path(), sink)?;
        Ok(())
    }

    /// Replace the file content with every byte from `source`.
    ///
    /// Creates the file if absent. Parent folders must already exist.
    pub fn write_contents(&self, source: &mut dyn Read) -> Result<()> {
        if self.kind() == ItemKind::Folder {
            return Err(Error::unsupported(format!(
                "Cannot write data stream to folder: {}",
                self.path
            )));
        }
        let written = io::write_from_reader(&self.filesystem_path(), source)?;
        tracing::debug!(path = %self.path, bytes = written, "Wrote item contents");
        Ok(())
    }

    /// Remove this item, and for folders everything beneath it.
    ///
    /// Folders are emptied depth-first before being removed. The first
    /// failure aborts the walk and leaves whatever was not yet deleted in
    /// place. Symbolic links are removed as links and never followed.
    pub fn delete(&self) -> Result<()> {
        if self.path.is_root() {
            return Err(Error::unsupported("Cannot delete the repository root"));
        }
        delete_tree(&self.filesystem_path())?;
        tracing::debug!(path = %self.path, "Deleted item");
        Ok(())
    }

    /// Create this folder and any missing ancestors. Idempotent.
    pub fn mkdir(&self) -> Result<()> {
        let dir = self.filesystem_path();
        fs::create_dir_all(&dir).map_err(|e| filehead_fs::Error::io(&dir, e))?;
        Ok(())
    }
}

/// Post-order removal with an explicit stack instead of recursion.
fn delete_tree(root: &Path) -> Result<()> {
    let delete_failed = |path: &Path, source: std::io::Error| Error::DeleteFailed {
        path: path.to_path_buf(),
        source,
    };

    // (path, children already queued)
    let mut stack = vec![(root.to_path_buf(), false)];
    while let Some((path, expanded)) = stack.pop() {
        if expanded {
            fs::remove_dir(&path).map_err(|e| delete_failed(&path, e))?;
            continue;
        }

        let meta = fs::symlink_metadata(&path).map_err(|e| delete_failed(&path, e))?;
        if !meta.is_dir() {
            fs::remove_file(&path).map_err(|e| delete_failed(&path, e))?;
            continue;
        }

        stack.push((path.clone(), true));
        for entry in fs::read_dir(&path).map_err(|e| delete_failed(&path, e))? {
            let entry = entry.map_err(|e| delete_failed(&path, e))?;
            stack.push((entry.path(), false));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::StaticUser;
    use tempfile::TempDir;

    fn item(temp: &TempDir, path: &str) -> Item {
        Item::new(
            Repository::new(temp.path()),
            Arc::new(StaticUser::new("alice")),
            ItemPath::new(path).unwrap(),
            Revision::now(),
        )
    }

    #[test]
    fn missing_path_is_a_file_of_size_zero() {
        let temp = TempDir::new().unwrap();
        let missing = item(&temp, "nope.txt");
        assert!(!missing.exists());
        assert_eq!(missing.kind(), ItemKind::File);
        assert_eq!(missing.size(), 0);
        assert!(missing.children().unwrap().is_empty());
    }

    #[test]
    fn root_item_is_a_folder() {
        let temp = TempDir::new().unwrap();
        let root = item(&temp, "/");
        assert!(root.exists());
        assert_eq!(root.kind(), ItemKind::Folder);
        assert_eq!(root.size(), 0);
    }

    #[test]
    fn root_cannot_be_deleted() {
        let temp = TempDir::new().unwrap();
        let result = item(&temp, "/").delete();
        assert!(matches!(result, Err(Error::UnsupportedOperation { .. })));
        assert!(temp.path().exists());
    }

    #[test]
    fn children_share_context_and_sort_by_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("c")).unwrap();

        let root = item(&temp, "/");
        let children = root.children().unwrap();
        let names: Vec<_> = children.iter().map(|c| c.path().as_str()).collect();
        assert_eq!(names, vec!["/a.txt", "/b.txt", "/c"]);
        for child in &children {
            assert_eq!(child.revision_changed(), root.revision_changed());
            assert_eq!(child.revision_changed_author(), "alice");
        }
    }

    #[test]
    fn delete_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let result = item(&temp, "ghost.txt").delete();
        assert!(matches!(result, Err(Error::DeleteFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn delete_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("keep.txt"), "keep").unwrap();

        fs::create_dir(temp.path().join("folder")).unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("folder/link")).unwrap();

        item(&temp, "folder").delete().unwrap();

        assert!(!temp.path().join("folder").exists());
        assert!(outside.path().join("keep.txt").exists());
    }
}
