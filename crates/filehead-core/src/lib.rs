//! Filesystem-backed content repository
//!
//! Exposes a plain directory tree as a versioned content repository:
//!
//! - **Items**: transient views of files and folders under the root
//! - **Lookup**: resolving ids, listing children and walking descendants
//! - **Commit**: applying ordered patchsets of file and folder changes
//! - **Locks**: advisory per-path locks kept in a [`LockStore`]
//! - **Configuration**: layered resolution of [`BackendConfig`]
//!
//! # Architecture
//!
//! ```text
//!                 filehead (CLI)
//!                       |
//!                 filehead-core
//!     Backend -> ItemLookup / Commit -> Item
//!                       |
//!                  filehead-fs
//!      ItemPath, checksums, streaming io, config files
//! ```
//!
//! # Example
//!
//! ```no_run
//! use filehead_core::{Backend, BackendConfig, PatchItem, Patchset, Revision};
//! use filehead_fs::ItemPath;
//!
//! fn example() -> filehead_core::Result<()> {
//!     let config = BackendConfig {
//!         root: Some("/srv/site".into()),
//!         ..Default::default()
//!     };
//!     let backend = Backend::open(&config)?;
//!
//!     let patchset = Patchset::new(Revision::now())
//!         .with(PatchItem::folder_add(ItemPath::new("docs")?))
//!         .with(PatchItem::file_add(ItemPath::new("docs/a.txt")?, &b"hello"[..]));
//!     let revision = backend.commit().run(patchset)?;
//!
//!     let lookup = backend.lookup(revision);
//!     let docs = backend.repository().parse_id("docs")?;
//!     for id in lookup.descendants(&docs)? {
//!         println!("{id}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod commit;
pub mod config;
pub mod error;
pub mod item;
pub mod lock;
pub mod lookup;
pub mod patch;
pub mod repository;
pub mod revision;
pub mod user;

pub use backend::Backend;
pub use commit::Commit;
pub use config::{BackendConfig, ConfigResolver, LockSettings, LockStoreKind};
pub use error::{Error, Result};
pub use item::{Item, ItemKind};
pub use lock::{FileLockStore, Lock, LockCollection, LockStore, MemoryLockStore};
pub use lookup::ItemLookup;
pub use patch::{ContentSource, PatchItem, PatchKind, Patchset};
pub use repository::{ItemId, Repository};
pub use revision::Revision;
pub use user::{CurrentUser, StaticUser, SystemUser};
