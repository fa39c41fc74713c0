//! [`TestTree`] builder for content-tree test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory used as a repository root, with helpers for
/// laying out files and asserting on the result.
///
/// Paths passed to the helpers are relative to the root and use `/`.
///
/// # Example
///
/// ```rust,no_run
/// use filehead_test_utils::TestTree;
///
/// let tree = TestTree::new()
///     .with_file("docs/a.txt", "hello")
///     .with_dir("assets");
/// tree.assert_file_contains("docs/a.txt", "hello");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A three-level tree used by traversal tests:
    ///
    /// ```text
    /// a.txt
    /// docs/
    ///   guide.md
    ///   api/
    ///     index.md
    ///     v1/
    ///       endpoints.md
    /// empty/
    /// ```
    pub fn nested() -> Self {
        Self::new()
            .with_file("a.txt", "top")
            .with_file("docs/guide.md", "# Guide")
            .with_file("docs/api/index.md", "# API")
            .with_file("docs/api/v1/endpoints.md", "GET /")
            .with_dir("empty")
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute location of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |acc, s| acc.join(s))
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn with_file(self, rel: &str, content: impl AsRef<[u8]>) -> Self {
        self.write(rel, content);
        self
    }

    /// Create the directory `rel` and its ancestors.
    pub fn with_dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.path(rel)).unwrap();
        self
    }

    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let full_path = self.path(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Create a symbolic link at `link` pointing to `target` (relative to
    /// the root).
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) {
        std::os::unix::fs::symlink(self.path(target), self.path(link)).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        let full_path = self.path(rel);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }

    pub fn assert_is_dir(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.is_dir(),
            "Expected a directory: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            rel,
            content,
            file_content
        );
    }
}
