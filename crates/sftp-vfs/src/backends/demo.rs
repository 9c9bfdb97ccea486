//! Demo backend.
//!
//! Exposes a single synthetic directory and refuses everything else. Useful
//! for sandboxed deployments and for exercising a protocol layer without
//! touching real storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{VfsError, VfsResult};
use crate::ops::{Vfs, VfsFile};
use crate::path::clean_path;
use crate::types::{FileAttr, OpenFlags, StatFs};

/// Name of the one entry the demo backend ever reports.
pub const DEMO_ENTRY_NAME: &str = "bob";

/// Size reported for the synthetic entry.
pub const DEMO_ENTRY_SIZE: u64 = 10;

fn demo_entry() -> FileAttr {
    FileAttr::directory(DEMO_ENTRY_NAME, DEMO_ENTRY_SIZE, 0o755)
}

/// Inert backend with no association to real storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoBackend;

impl DemoBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Vfs for DemoBackend {
    async fn open_dir(&self, path: &Path) -> VfsResult<Box<dyn VfsFile>> {
        tracing::debug!(path = %path.display(), "demo: open_dir");
        Ok(Box::new(DemoFile::new()))
    }

    async fn open_file(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn VfsFile>> {
        tracing::debug!(path = %path.display(), ?flags, "demo: open_file");
        Ok(Box::new(DemoFile::new()))
    }

    async fn stat(&self, path: &Path) -> VfsResult<FileAttr> {
        tracing::debug!(path = %path.display(), "demo: stat");
        Ok(demo_entry())
    }

    async fn lstat(&self, path: &Path) -> VfsResult<FileAttr> {
        tracing::debug!(path = %path.display(), "demo: lstat");
        Ok(demo_entry())
    }

    /// Identity: the demo backend has no links to resolve.
    async fn readlink(&self, path: &Path) -> VfsResult<PathBuf> {
        Ok(path.to_path_buf())
    }

    /// Same lexical canonicalization as the local backend, anchored at the
    /// virtual root since there is no working directory here.
    async fn real_path(&self, path: &Path) -> VfsResult<PathBuf> {
        let real = clean_path(path);
        tracing::debug!(path = %path.display(), real = %real.display(), "demo: real_path");
        Ok(real)
    }

    async fn statvfs(&self, path: &Path) -> VfsResult<StatFs> {
        tracing::debug!(path = %path.display(), "demo: statvfs");
        Err(VfsError::Unsupported)
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn mkdir(&self, path: &Path, _mode: u32) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), "demo: mkdir");
        Err(VfsError::Unsupported)
    }

    async fn remove(&self, path: &Path) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), "demo: remove");
        Err(VfsError::Unsupported)
    }

    async fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        tracing::debug!(from = %from.display(), to = %to.display(), "demo: rename");
        Err(VfsError::Unsupported)
    }

    async fn symlink(&self, _target: &Path, link: &Path) -> VfsResult<()> {
        tracing::debug!(link = %link.display(), "demo: symlink");
        Err(VfsError::Unsupported)
    }

    async fn link(&self, _original: &Path, link: &Path) -> VfsResult<()> {
        tracing::debug!(link = %link.display(), "demo: link");
        Err(VfsError::Unsupported)
    }

    async fn truncate(&self, path: &Path, size: u64) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), size, "demo: truncate");
        Err(VfsError::Unsupported)
    }

    async fn chmod(&self, path: &Path, _mode: u32) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), "demo: chmod");
        Err(VfsError::Unsupported)
    }

    async fn chown(&self, path: &Path, _uid: u32, _gid: u32) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), "demo: chown");
        Err(VfsError::Unsupported)
    }

    async fn chtimes(&self, path: &Path, _atime: SystemTime, _mtime: SystemTime) -> VfsResult<()> {
        tracing::debug!(path = %path.display(), "demo: chtimes");
        Err(VfsError::Unsupported)
    }
}

/// Handle returned by every [`DemoBackend`] open call.
#[derive(Debug)]
pub struct DemoFile {
    /// Incremented once the single entry has been delivered.
    dir_cursor: u32,
}

impl DemoFile {
    fn new() -> Self {
        Self { dir_cursor: 0 }
    }
}

#[async_trait]
impl VfsFile for DemoFile {
    fn name(&self) -> &str {
        DEMO_ENTRY_NAME
    }

    async fn stat(&self) -> VfsResult<FileAttr> {
        Ok(demo_entry())
    }

    async fn read_at(&self, _buf: &mut [u8], _offset: u64) -> VfsResult<usize> {
        Err(VfsError::Unsupported)
    }

    async fn write_at(&self, _buf: &[u8], _offset: u64) -> VfsResult<usize> {
        Err(VfsError::Unsupported)
    }

    async fn chmod(&self, _mode: u32) -> VfsResult<()> {
        Err(VfsError::Unsupported)
    }

    async fn chown(&self, _uid: u32, _gid: u32) -> VfsResult<()> {
        Err(VfsError::Unsupported)
    }

    async fn truncate(&self, _size: u64) -> VfsResult<()> {
        Err(VfsError::Unsupported)
    }

    async fn readdir(&mut self, _max_entries: usize) -> VfsResult<Vec<FileAttr>> {
        tracing::debug!(cursor = self.dir_cursor, "demo: readdir");
        if self.dir_cursor > 0 {
            return Err(VfsError::Eof);
        }
        self.dir_cursor += 1;
        Ok(vec![demo_entry()])
    }

    async fn close(&mut self) -> VfsResult<()> {
        Ok(())
    }
}
