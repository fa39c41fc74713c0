use filehead_fs::{Error, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_from_reader_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");

    let written = io::write_from_reader(&path, &mut "hello world".as_bytes()).unwrap();

    assert_eq!(written, 11);
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
}

#[test]
fn test_write_from_reader_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.txt");
    fs::write(&path, "original").unwrap();

    io::write_from_reader(&path, &mut "updated".as_bytes()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_from_reader_does_not_create_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("test.txt");

    let result = io::write_from_reader(&path, &mut "data".as_bytes());

    assert!(matches!(result, Err(Error::Io { .. })));
    assert!(!temp.path().join("missing").exists());
}

#[test]
fn test_copy_file_into_round_trips_binary() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blob.bin");
    let content: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
    fs::write(&path, &content).unwrap();

    let mut sink = Vec::new();
    let copied = io::copy_file_into(&path, &mut sink).unwrap();

    assert_eq!(copied, content.len() as u64);
    assert_eq!(sink, content);
}

#[test]
fn test_copy_file_into_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let mut sink = Vec::new();
    let result = io::copy_file_into(&temp.path().join("nope.txt"), &mut sink);
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_write_atomic_creates_parents_and_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("ledger.toml");

    io::write_atomic(&path, b"version = 1").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "version = 1");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("target.txt");

    io::write_atomic(&path, b"content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(
        leftovers.is_empty(),
        "No temp files should remain after successful write, found: {:?}",
        leftovers.iter().map(|e| e.file_name()).collect::<Vec<_>>()
    );
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let result = io::read_text(&temp.path().join("file.txt"));
    assert!(result.is_err());
}
