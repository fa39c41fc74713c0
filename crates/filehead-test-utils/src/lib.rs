//! Shared test utilities for the filehead workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for scratch content trees

pub mod tree;

pub use tree::TestTree;
