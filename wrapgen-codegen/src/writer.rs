//! Output sinks for generated files.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persists generated files.
pub trait Writer: Send + Sync {
    /// Writes `contents` to `path`, replacing any previous content.
    ///
    /// # Errors
    /// Returns an IO error if the content cannot be stored.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Writes files to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl Writer for FsWriter {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}

/// Keeps generated files in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content written to `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    /// Returns the content written to `path` as text.
    #[must_use]
    pub fn get_string(&self, path: &Path) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Paths written so far, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }

    /// Number of files written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl Writer for MemoryWriter {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files.lock().insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fs_writer_creates_parents() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("out.go");
        FsWriter.write(&path, b"package p\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "package p\n");

        FsWriter.write(&path, b"package q\n").expect("overwrite");
        assert_eq!(fs::read_to_string(&path).expect("read"), "package q\n");
    }

    #[test]
    fn test_memory_writer() {
        let writer = MemoryWriter::new();
        assert!(writer.is_empty());
        writer.write(Path::new("b.go"), b"b").expect("write");
        writer.write(Path::new("a.go"), b"a").expect("write");
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.paths(), vec![PathBuf::from("a.go"), PathBuf::from("b.go")]);
        assert_eq!(writer.get_string(Path::new("a.go")).as_deref(), Some("a"));
        assert!(writer.get(Path::new("c.go")).is_none());
    }

    #[test]
    fn test_memory_writer_shared_between_threads() {
        let writer = Arc::new(MemoryWriter::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || {
                    let path = PathBuf::from(format!("{i}.go"));
                    writer.write(&path, b"x").expect("write");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert_eq!(writer.len(), 4);
    }
}
