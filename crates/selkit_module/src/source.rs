//! File access for module resolution and loading.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::id::normalize;

/// Read access to the files modules are loaded from.
///
/// The resolver only asks whether a path is a file; the loader reads it.
pub trait SourceProvider: Send + Sync {
    /// Returns true when `path` names an existing file.
    fn is_file(&self, path: &Path) -> bool;

    /// Reads the full contents of `path`.
    ///
    /// Missing files report [`io::ErrorKind::NotFound`].
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads modules straight from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SourceProvider for FsSource {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// An in-memory file tree.
///
/// Useful for module repositories bundled into the host binary. Files can be
/// replaced at any time; the loader only reads a file when its cache entry is
/// missing.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl MemorySource {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files
            .write()
            .insert(normalize(path.as_ref()), contents.into());
    }

    /// Removes a file, returning whether it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files.write().remove(&normalize(path.as_ref())).is_some()
    }

    /// Builder-style variant of [`MemorySource::insert`].
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl SourceProvider for MemorySource {
    fn is_file(&self, path: &Path) -> bool {
        self.files.read().contains_key(&normalize(path))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .read()
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
