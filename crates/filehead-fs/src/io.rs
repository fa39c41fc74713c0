//! Scoped streaming I/O and atomic writes
//!
//! Every handle opened here is owned by the function that opened it and is
//! closed on drop, so it is released on success and on every error path.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::{Error, Result};

const COPY_BUF_SIZE: usize = 64 * 1024;

/// Stream the full contents of the file at `path` into `sink`.
///
/// Read failures are reported as [`Error::Io`], failures of the sink as
/// [`Error::SinkWrite`]. Returns the number of bytes copied.
pub fn copy_file_into(path: &Path, sink: &mut dyn Write) -> Result<u64> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io(path, e)),
        };
        sink.write_all(&buf[..n]).map_err(|e| Error::SinkWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        total += n as u64;
    }
    sink.flush().map_err(|e| Error::SinkWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(total)
}

/// Replace the file at `path` with every byte from `source`.
///
/// The file is created if absent and truncated if present. Parent
/// directories are not created. Returns the number of bytes written.
pub fn write_from_reader(path: &Path, source: &mut dyn Read) -> Result<u64> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::SourceRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        file.write_all(&buf[..n]).map_err(|e| Error::io(path, e))?;
        total += n as u64;
    }
    file.flush().map_err(|e| Error::io(path, e))?;
    Ok(total)
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access. Unlike
/// [`write_from_reader`], missing parent directories are created.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("source broke"))
        }
    }

    #[test]
    fn copy_reports_sink_failure_separately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "data").unwrap();

        let result = copy_file_into(&path, &mut FailingSink);
        assert!(matches!(result, Err(Error::SinkWrite { .. })));
    }

    #[test]
    fn copy_of_empty_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let mut sink = Vec::new();
        assert_eq!(copy_file_into(&path, &mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn write_reports_source_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");

        let result = write_from_reader(&path, &mut FailingSource);
        assert!(matches!(result, Err(Error::SourceRead { .. })));
    }

    #[test]
    fn write_truncates_longer_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "a much longer original").unwrap();

        write_from_reader(&path, &mut "short".as_bytes()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }
}
