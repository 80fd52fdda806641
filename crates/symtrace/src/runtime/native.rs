//! `std::fs`-backed runtime.

use std::path::Path;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, err: std::io::Error) -> RuntimeError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("{}: {}", path.display(), err))
    }
}

impl Runtime for NativeRuntime {
    fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| io_error(path, e))
    }

    fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
        Ok(FileMetadata {
            size: metadata.len(),
            is_dir: metadata.is_dir(),
            is_file: metadata.is_file(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_and_stats_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.ts");
        std::fs::write(&file, b"export const a = 1;").unwrap();

        let runtime = NativeRuntime::new();
        assert_eq!(runtime.read_file(&file).unwrap(), b"export const a = 1;");
        assert!(runtime.is_file(&file));
        assert!(runtime.is_dir(temp.path()));
        assert_eq!(runtime.metadata(&file).unwrap().size, 19);
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ts");
        let err = NativeRuntime.read_file(&missing).unwrap_err();
        assert!(matches!(err, RuntimeError::FileNotFound(p) if p == missing));
        assert!(!NativeRuntime.exists(&missing));
    }
}
