//! Change records and patchsets

use filehead_fs::ItemPath;
use std::io::Read;

use crate::revision::Revision;

/// Readable content carried by file additions and modifications.
pub type ContentSource = Box<dyn Read + Send>;

/// One typed change to apply to the repository.
pub enum PatchItem {
    /// Create (or overwrite) a file.
    FileAdd { path: ItemPath, content: ContentSource },
    /// Replace the content of a file that must already exist.
    FileModification { path: ItemPath, content: ContentSource },
    FileDelete { path: ItemPath },
    /// Create a folder and any missing ancestors.
    FolderAdd { path: ItemPath },
    /// Delete a folder and everything beneath it.
    FolderDelete { path: ItemPath },
    /// Copy a file; part of the content model but not applied by this backend.
    FileCopy { from: ItemPath, path: ItemPath },
    /// Move a file; part of the content model but not applied by this backend.
    FileMove { from: ItemPath, path: ItemPath },
}

/// The variant of a [`PatchItem`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    FileAdd,
    FileModification,
    FileDelete,
    FolderAdd,
    FolderDelete,
    FileCopy,
    FileMove,
}

impl std::fmt::Display for PatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FileAdd => "FileAdd",
            Self::FileModification => "FileModification",
            Self::FileDelete => "FileDelete",
            Self::FolderAdd => "FolderAdd",
            Self::FolderDelete => "FolderDelete",
            Self::FileCopy => "FileCopy",
            Self::FileMove => "FileMove",
        };
        write!(f, "{name}")
    }
}

impl PatchItem {
    pub fn file_add(path: ItemPath, content: impl Read + Send + 'static) -> Self {
        Self::FileAdd {
            path,
            content: Box::new(content),
        }
    }

    pub fn file_modification(path: ItemPath, content: impl Read + Send + 'static) -> Self {
        Self::FileModification {
            path,
            content: Box::new(content),
        }
    }

    pub fn file_delete(path: ItemPath) -> Self {
        Self::FileDelete { path }
    }

    pub fn folder_add(path: ItemPath) -> Self {
        Self::FolderAdd { path }
    }

    pub fn folder_delete(path: ItemPath) -> Self {
        Self::FolderDelete { path }
    }

    /// The path this record changes.
    pub fn path(&self) -> &ItemPath {
        match self {
            Self::FileAdd { path, .. }
            | Self::FileModification { path, .. }
            | Self::FileDelete { path }
            | Self::FolderAdd { path }
            | Self::FolderDelete { path }
            | Self::FileCopy { path, .. }
            | Self::FileMove { path, .. } => path,
        }
    }

    pub fn kind(&self) -> PatchKind {
        match self {
            Self::FileAdd { .. } => PatchKind::FileAdd,
            Self::FileModification { .. } => PatchKind::FileModification,
            Self::FileDelete { .. } => PatchKind::FileDelete,
            Self::FolderAdd { .. } => PatchKind::FolderAdd,
            Self::FolderDelete { .. } => PatchKind::FolderDelete,
            Self::FileCopy { .. } => PatchKind::FileCopy,
            Self::FileMove { .. } => PatchKind::FileMove,
        }
    }
}

impl std::fmt::Debug for PatchItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct(&self.kind().to_string());
        if let Self::FileCopy { from, .. } | Self::FileMove { from, .. } = self {
            s.field("from", from);
        }
        s.field("path", self.path()).finish_non_exhaustive()
    }
}

/// An ordered batch of change records forming one commit.
///
/// Records are applied in insertion order. The patchset does not reorder
/// anything: a file added inside a new folder must come after the folder.
#[derive(Debug)]
pub struct Patchset {
    base: Revision,
    message: Option<String>,
    items: Vec<PatchItem>,
}

impl Patchset {
    /// Start an empty patchset against the revision the caller last saw.
    pub fn new(base: Revision) -> Self {
        Self {
            base,
            message: None,
            items: Vec::new(),
        }
    }

    /// Attach a history message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Append a record, builder style.
    pub fn with(mut self, item: PatchItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn push(&mut self, item: PatchItem) {
        self.items.push(item);
    }

    pub fn base_revision(&self) -> Revision {
        self.base
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Patchset {
    type Item = PatchItem;
    type IntoIter = std::vec::IntoIter<PatchItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Extend<PatchItem> for Patchset {
    fn extend<I: IntoIterator<Item = PatchItem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
