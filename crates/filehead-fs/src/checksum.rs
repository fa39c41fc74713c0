//! MD5 content checksums
//!
//! Content is streamed through the digest in fixed-size chunks so large
//! files never need to be held in memory.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

const CHUNK_SIZE: usize = 64 * 1024;

/// Digest algorithms a [`Checksum`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        };
        write!(f, "{name}")
    }
}

/// Content checksum of a file item.
///
/// Only MD5 is computed; asking for any other algorithm yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    md5: String,
}

impl Checksum {
    /// Whether a digest for `algorithm` is available.
    pub fn has(&self, algorithm: ChecksumAlgorithm) -> bool {
        algorithm == ChecksumAlgorithm::Md5
    }

    /// Lowercase hex digest for `algorithm`, if carried.
    pub fn hex(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        match algorithm {
            ChecksumAlgorithm::Md5 => Some(&self.md5),
            _ => None,
        }
    }

    pub fn md5(&self) -> &str {
        &self.md5
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "md5:{}", self.md5)
    }
}

/// Compute the checksum of in-memory content.
pub fn compute_content_checksum(content: &[u8]) -> Checksum {
    Checksum {
        md5: hex::encode(Md5::digest(content)),
    }
}

/// Stream a reader to exhaustion through the digest.
pub fn compute_reader_checksum(reader: &mut dyn Read) -> std::io::Result<Checksum> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(Checksum {
        md5: hex::encode(hasher.finalize()),
    })
}

/// Compute the checksum of a file's contents.
///
/// # Errors
///
/// Returns an error carrying the path if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<Checksum> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    compute_reader_checksum(&mut file).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_is_deterministic() {
        let a = compute_content_checksum(b"test");
        let b = compute_content_checksum(b"test");
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_different_checksum() {
        let a = compute_content_checksum(b"aaa");
        let b = compute_content_checksum(b"aab");
        assert_ne!(a, b);
    }

    #[test]
    fn content_checksum_known_value() {
        let checksum = compute_content_checksum(b"hello world");
        assert_eq!(checksum.md5(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(checksum.to_string(), "md5:5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn empty_content_known_value() {
        let checksum = compute_content_checksum(b"");
        assert_eq!(checksum.md5(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn only_md5_is_carried() {
        let checksum = compute_content_checksum(b"x");
        assert!(checksum.has(ChecksumAlgorithm::Md5));
        assert!(!checksum.has(ChecksumAlgorithm::Sha256));
        assert_eq!(checksum.hex(ChecksumAlgorithm::Sha1), None);
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        let file_cs = compute_file_checksum(&path).unwrap();
        let content_cs = compute_content_checksum(b"hello world");
        assert_eq!(file_cs, content_cs);
    }

    #[test]
    fn reader_checksum_spans_chunks() {
        let content = vec![7u8; CHUNK_SIZE * 2 + 13];
        let mut reader = std::io::Cursor::new(content.clone());
        let streamed = compute_reader_checksum(&mut reader).unwrap();
        assert_eq!(streamed, compute_content_checksum(&content));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = compute_file_checksum(&dir.path().join("nope"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
