//! Filesystem primitives for filehead
//!
//! Provides the repository-relative [`ItemPath`] value type, MD5 content
//! checksums, scoped streaming I/O and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{Checksum, ChecksumAlgorithm};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::ItemPath;
