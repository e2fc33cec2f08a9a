use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// Whole-file access used by the catalog.
///
/// Reads are synchronous because they only happen while a store is being
/// constructed. Writes overwrite any prior content.
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    async fn write(&self, path: &Path, contents: Vec<u8>) -> io::Result<()>;
}

/// Local file system: `std::fs` for reads, `tokio::fs` for writes.
#[derive(Debug, Clone)]
pub struct FsBackend {
    create_parent_dirs: bool,
}

impl FsBackend {
    pub fn new(create_parent_dirs: bool) -> Self { Self { create_parent_dirs } }
}

impl Default for FsBackend {
    fn default() -> Self { Self::new(true) }
}

#[async_trait]
impl SnapshotBackend for FsBackend {
    fn exists(&self, path: &Path) -> bool { path.exists() }

    fn read_to_string(&self, path: &Path) -> io::Result<String> { std::fs::read_to_string(path) }

    async fn write(&self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        if self.create_parent_dirs {
            common::env::ensure_parent_dir(path)
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
        }
        tokio::fs::write(path, contents).await
    }
}

/// In-process files keyed by path. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).insert(path.into(), contents.into());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.get(path).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn set_fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let bytes = files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))?;
        String::from_utf8(bytes.clone()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn write(&self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "write refused"));
        }
        self.files.lock().unwrap_or_else(|e| e.into_inner()).insert(path.to_path_buf(), contents);
        Ok(())
    }
}
