//! Repository-relative item paths

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A location relative to a repository root.
///
/// Paths are kept in one normalized form so that equality is plain string
/// equality: forward slashes, a single leading `/`, no trailing slash, and
/// no empty or `.` segments. The root is `/`. Parent references (`..`) are
/// rejected so a path can never resolve outside the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl ItemPath {
    /// The repository root, `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Parse and normalize a path string.
    ///
    /// On Windows backslashes are treated as separators; elsewhere they are
    /// ordinary name characters.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();

        let mut segments = Vec::new();
        for segment in raw.split(is_separator) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(Error::invalid_path(
                        raw,
                        "parent references are not allowed",
                    ));
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self {
            inner: format!("/{}", segments.join("/")),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Derive the child path for one directory entry name.
    ///
    /// The segment is used verbatim; it must be non-empty and must not be a
    /// separator, `.` or `..`.
    pub fn append(&self, segment: &str) -> Result<Self> {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(is_separator)
        {
            return Err(Error::invalid_path(
                format!("{}/{}", self.inner.trim_end_matches('/'), segment),
                "not a single path segment",
            ));
        }
        let inner = if self.is_root() {
            format!("/{segment}")
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Ok(Self { inner })
    }

    /// Get the parent path, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.inner.rsplit('/').next()
    }

    /// Iterate over the path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Remove a leading prefix, segment-wise.
    ///
    /// Returns `None` when `prefix` is not an ancestor of (or equal to) this
    /// path.
    pub fn strip_prefix(&self, prefix: &ItemPath) -> Option<Self> {
        let mut own = self.segments();
        for expected in prefix.segments() {
            if own.next() != Some(expected) {
                return None;
            }
        }
        let rest: Vec<&str> = own.collect();
        if rest.is_empty() {
            Some(Self::root())
        } else {
            Some(Self {
                inner: format!("/{}", rest.join("/")),
            })
        }
    }

    /// Convert to a relative platform-native path for joining onto a root.
    pub fn to_relative_native(&self) -> PathBuf {
        self.segments().collect()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

impl Default for ItemPath {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for ItemPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for ItemPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ItemPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for ItemPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl<'de> Deserialize<'de> for ItemPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent_or_name() {
        let root = ItemPath::root();
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.name(), None);
    }

    #[test]
    fn strip_prefix_segment_wise() {
        let path = ItemPath::new("/srv/repo/docs/a.txt").unwrap();
        let prefix = ItemPath::new("/srv/repo").unwrap();
        assert_eq!(path.strip_prefix(&prefix).unwrap().as_str(), "/docs/a.txt");

        // "/srv/rep" is a string prefix but not a segment prefix
        let partial = ItemPath::new("/srv/rep").unwrap();
        assert_eq!(path.strip_prefix(&partial), None);
    }

    #[cfg(not(windows))]
    #[test]
    fn backslash_is_a_name_character() {
        let path = ItemPath::new("docs/a\\b.txt").unwrap();
        assert_eq!(path.name(), Some("a\\b.txt"));
        assert_eq!(ItemPath::root().append("a\\b.txt").unwrap().as_str(), "/a\\b.txt");
    }

    #[test]
    fn serde_uses_normalized_string() {
        let path = ItemPath::new("docs//a.txt").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/docs/a.txt\"");

        let back: ItemPath = serde_json::from_str("\"docs/./a.txt/\"").unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn deserialize_rejects_parent_reference() {
        let result: std::result::Result<ItemPath, _> = serde_json::from_str("\"../etc\"");
        assert!(result.is_err());
    }
}
