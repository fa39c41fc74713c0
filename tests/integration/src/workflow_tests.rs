//! End-to-end workflows across configuration, commits, lookup and locks
//!
//! Each test walks a complete editing session the way an embedding
//! application would: resolve configuration, open the backend, lock, change,
//! inspect and release.

use filehead_core::{
    Backend, BackendConfig, ConfigResolver, Error, ItemKind, LockSettings, LockStoreKind,
    PatchItem, Patchset, Revision,
};
use filehead_fs::{ChecksumAlgorithm, ItemPath, checksum};
use filehead_test_utils::TestTree;
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn p(s: &str) -> ItemPath {
    ItemPath::new(s).unwrap()
}

fn file_config(tree: &TestTree, state: &TempDir, user: &str) -> BackendConfig {
    BackendConfig {
        root: Some(tree.root().to_path_buf()),
        name: Some("site".into()),
        user: Some(user.into()),
        locks: LockSettings {
            store: Some(LockStoreKind::File),
            path: Some(state.path().join("site-locks.toml")),
        },
    }
}

#[test]
fn test_publish_session() {
    let tree = TestTree::new().with_file("index.html", "<h1>old</h1>");
    let state = TempDir::new().unwrap();
    let global = TempDir::new().unwrap();
    fs::write(
        global.path().join("config.toml"),
        format!(
            "root = {:?}\nname = \"site\"\n\n[locks]\nstore = \"file\"\npath = {:?}\n",
            tree.root().display().to_string(),
            state.path().join("site-locks.toml").display().to_string()
        ),
    )
    .unwrap();

    let config = ConfigResolver::new()
        .with_global_config_dir(global.path())
        .resolve_with_env(|key| (key == "FILEHEAD_USER").then(|| "editor".to_string()))
        .unwrap();
    let backend = Backend::open(&config).unwrap();
    let commit = backend.commit();

    // Lock what will change
    let base = Revision::now();
    let locks = commit
        .lock("publish v2", &base, &[p("index.html"), p("docs")])
        .unwrap();
    assert_eq!(locks.len(), 2);

    // Apply
    let patchset = Patchset::new(base)
        .with_message("publish v2")
        .with(PatchItem::file_modification(p("index.html"), &b"<h1>new</h1>"[..]))
        .with(PatchItem::folder_add(p("docs/guides")))
        .with(PatchItem::file_add(p("docs/guides/start.md"), &b"# Start"[..]))
        .with(PatchItem::file_add(p("docs/faq.md"), &b"# FAQ"[..]));
    let revision = commit.run(patchset).unwrap();

    // Inspect
    let lookup = backend.lookup(revision);
    let repo = backend.repository();
    let root = repo.parse_id("site:/").unwrap();
    let all: Vec<String> = lookup
        .descendants(&root)
        .unwrap()
        .iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(
        all,
        vec![
            "site:/docs",
            "site:/index.html",
            "site:/docs/faq.md",
            "site:/docs/guides",
            "site:/docs/guides/start.md",
        ]
    );

    let index = lookup.get_item(&repo.parse_id("index.html").unwrap()).unwrap();
    assert_eq!(
        index.checksum().unwrap().hex(ChecksumAlgorithm::Md5),
        checksum::compute_content_checksum(b"<h1>new</h1>").hex(ChecksumAlgorithm::Md5)
    );
    assert_eq!(index.revision_changed(), revision);
    assert_eq!(index.revision_changed_author(), "editor");
    assert!(lookup.locked(&index.id()).unwrap().is_some());

    // Release
    commit.unlock(locks.locks()).unwrap();
    assert!(backend.lock_store().list(repo).unwrap().is_empty());
}

#[test]
fn test_two_editors_share_the_ledger() {
    let tree = TestTree::new().with_file("a.txt", "a");
    let state = TempDir::new().unwrap();
    let alice = Backend::open(&file_config(&tree, &state, "alice")).unwrap();
    let bob = Backend::open(&file_config(&tree, &state, "bob")).unwrap();

    let held = alice
        .commit()
        .lock("mine", &Revision::now(), &[p("a.txt")])
        .unwrap();

    let err = bob
        .commit()
        .lock("mine too", &Revision::now(), &[p("a.txt")])
        .unwrap_err();
    assert!(matches!(err, Error::ItemLocked { owner, .. } if owner == "alice"));

    // bob sees alice's lock and may release it through the shared ledger
    let id = bob.repository().item_id(p("a.txt"));
    let seen = bob.lookup(Revision::now()).locked(&id).unwrap().unwrap();
    assert_eq!(seen.token, held.locks()[0].token);
    bob.commit().unlock(&[seen]).unwrap();

    alice
        .commit()
        .lock("again", &Revision::now(), &[p("a.txt")])
        .unwrap();
}

#[test]
fn test_parallel_editors_on_distinct_paths() {
    let tree = Arc::new(TestTree::new().with_dir("work"));
    let state = Arc::new(TempDir::new().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = Arc::clone(&tree);
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let backend =
                    Backend::open(&file_config(&tree, &state, &format!("user{i}"))).unwrap();
                let path = p(&format!("work/file{i}.txt"));
                let commit = backend.commit();
                let locks = commit
                    .lock("edit", &Revision::now(), std::slice::from_ref(&path))
                    .unwrap();
                let body = format!("written by user{i}").into_bytes();
                commit
                    .run(Patchset::new(Revision::now()).with(PatchItem::file_add(
                        path,
                        std::io::Cursor::new(body),
                    )))
                    .unwrap();
                commit.unlock(locks.locks()).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let backend = Backend::open(&file_config(&tree, &state, "reader")).unwrap();
    let work = backend.repository().parse_id("work").unwrap();
    let lookup = backend.lookup(Revision::now());
    let files = lookup.immediate_files(&work).unwrap();
    assert_eq!(files.len(), 4);
    for id in &files {
        let item = lookup.get_item(id).unwrap();
        assert_eq!(item.kind(), ItemKind::File);
        let mut body = Vec::new();
        item.contents(&mut body).unwrap();
        assert!(String::from_utf8(body).unwrap().starts_with("written by user"));
    }
    assert!(backend.lock_store().list(backend.repository()).unwrap().is_empty());
}

#[test]
fn test_failed_session_leaves_partial_changes() {
    let tree = TestTree::new();
    let state = TempDir::new().unwrap();
    let backend = Backend::open(&file_config(&tree, &state, "alice")).unwrap();

    let patchset = Patchset::new(Revision::now())
        .with(PatchItem::folder_add(p("docs")))
        .with(PatchItem::file_add(p("docs/a.txt"), &b"a"[..]))
        .with(PatchItem::file_add(p("missing/b.txt"), &b"b"[..]))
        .with(PatchItem::file_add(p("docs/c.txt"), &b"c"[..]));

    assert!(backend.commit().run(patchset).is_err());

    tree.assert_file_contains("docs/a.txt", "a");
    tree.assert_not_exists("missing");
    tree.assert_not_exists("docs/c.txt");
}
