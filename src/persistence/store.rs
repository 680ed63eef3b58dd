//! Durable blob stores
//!
//! One opaque named blob per installation. The file store writes a temp
//! sibling and renames it over the target, so a reader never observes a
//! half-written save.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Storage backend for a single blob
pub trait BlobStore {
    /// `Ok(None)` when nothing has been stored
    fn read(&self) -> io::Result<Option<Vec<u8>>>;
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
    /// Removing a missing blob is not an error
    fn remove(&mut self) -> io::Result<()>;
}

/// Blob stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "save".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BlobStore for FileStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }

    fn remove(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory blob; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<Option<Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the stored bytes, if any
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.borrow().clone()
    }

    /// Replace the stored bytes directly
    pub fn set_contents(&self, bytes: Option<Vec<u8>>) {
        *self.data.borrow_mut() = bytes;
    }
}

impl BlobStore for MemoryStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.set_contents(Some(bytes.to_vec()));
        Ok(())
    }

    fn remove(&mut self) -> io::Result<()> {
        self.set_contents(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("save.json"));

        assert_eq!(store.read().unwrap(), None);
        store.write(b"hello").unwrap();
        assert_eq!(store.read().unwrap(), Some(b"hello".to_vec()));
        store.write(b"world").unwrap();
        assert_eq!(store.read().unwrap(), Some(b"world".to_vec()));
        // Temp sibling is renamed away
        assert!(!dir.path().join("nested").join("save.json.tmp").exists());

        store.remove().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.remove().unwrap();
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.write(b"abc").unwrap();
        assert_eq!(store.contents(), Some(b"abc".to_vec()));
        writer.remove().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
