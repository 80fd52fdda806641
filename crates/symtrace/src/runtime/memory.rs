//! In-memory runtime for tests and embedders that already hold file contents.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// A virtual file tree. Directories exist implicitly as ancestors of files.
#[derive(Debug, Default, Clone)]
pub struct MemoryRuntime {
    files: FxHashMap<PathBuf, Vec<u8>>,
    dirs: FxHashSet<PathBuf>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryRuntime::insert`].
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf().clean();
        for ancestor in path.ancestors().skip(1) {
            if !self.dirs.insert(ancestor.to_path_buf()) {
                break;
            }
        }
        self.files.insert(path, contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Runtime for MemoryRuntime {
    fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf().clean();
        self.files
            .get(&path)
            .cloned()
            .ok_or(RuntimeError::FileNotFound(path))
    }

    fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf().clean();
        if let Some(contents) = self.files.get(&path) {
            return Ok(FileMetadata {
                size: contents.len() as u64,
                is_dir: false,
                is_file: true,
            });
        }
        if self.dirs.contains(&path) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
            });
        }
        Err(RuntimeError::FileNotFound(path))
    }

    fn exists(&self, path: &Path) -> bool {
        let path = path.to_path_buf().clean();
        self.files.contains_key(&path) || self.dirs.contains(&path)
    }
}
