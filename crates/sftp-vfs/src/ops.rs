//! VFS operation traits.
//!
//! [`Vfs`] is the whole surface a storage backend exposes to the protocol
//! layer; [`VfsFile`] is what one of its open calls hands back.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{VfsError, VfsResult};
use crate::status::Status;
use crate::translate::status_from_error;
use crate::types::{FileAttr, OpenFlags, StatFs};

/// An open file or directory handle.
///
/// The handle belongs to whoever opened it until [`VfsFile::close`]. Directory
/// handles own their enumeration cursor; two handles on the same path page
/// independently.
#[async_trait]
pub trait VfsFile: Send + Sync + std::fmt::Debug {
    /// Name the handle was opened with.
    fn name(&self) -> &str;

    /// Get attributes of the open entry.
    async fn stat(&self) -> VfsResult<FileAttr>;

    /// Read into `buf` starting at `offset`.
    ///
    /// Returns the number of bytes read, `Err(VfsError::Eof)` when `offset`
    /// is at or past the end. Directory handles fail with
    /// [`VfsError::Unsupported`].
    async fn read_at(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize>;

    /// Write `buf` at `offset`, returning the number of bytes written.
    async fn write_at(&self, buf: &[u8], offset: u64) -> VfsResult<usize>;

    async fn chmod(&self, mode: u32) -> VfsResult<()>;

    async fn chown(&self, uid: u32, gid: u32) -> VfsResult<()>;

    async fn truncate(&self, size: u64) -> VfsResult<()>;

    /// Return the next page of directory entries.
    ///
    /// At most `max_entries` are returned (`0` means all remaining). Once the
    /// listing is exhausted every further call returns `Err(VfsError::Eof)`.
    async fn readdir(&mut self, max_entries: usize) -> VfsResult<Vec<FileAttr>>;

    /// Release backend resources. Calling it again is harmless.
    async fn close(&mut self) -> VfsResult<()>;
}

/// A storage backend.
///
/// Paths are whatever the protocol layer received from the peer, interpreted
/// with POSIX semantics. Read-only backends reject every mutating call with
/// [`VfsError::Unsupported`], never with a permission error.
#[async_trait]
pub trait Vfs: Send + Sync + std::fmt::Debug {
    // ========================================================================
    // Opening
    // ========================================================================

    /// Open a directory for enumeration.
    async fn open_dir(&self, path: &Path) -> VfsResult<Box<dyn VfsFile>>;

    /// Open a file. Flags the backend cannot honor fail with
    /// [`VfsError::Unsupported`].
    async fn open_file(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn VfsFile>>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get attributes, following a terminal symlink.
    async fn stat(&self, path: &Path) -> VfsResult<FileAttr>;

    /// Get attributes without following a terminal symlink.
    async fn lstat(&self, path: &Path) -> VfsResult<FileAttr>;

    /// Read symbolic link target.
    async fn readlink(&self, path: &Path) -> VfsResult<PathBuf>;

    /// Canonical absolute form of `path`, with `.` and `..` resolved.
    async fn real_path(&self, path: &Path) -> VfsResult<PathBuf>;

    /// Get filesystem statistics for the filesystem holding `path`.
    async fn statvfs(&self, path: &Path) -> VfsResult<StatFs>;

    /// Returns true if this backend rejects all mutation.
    fn read_only(&self) -> bool;

    // ========================================================================
    // Mutation
    // ========================================================================

    async fn mkdir(&self, path: &Path, mode: u32) -> VfsResult<()>;

    /// Remove a file or an empty directory.
    async fn remove(&self, path: &Path) -> VfsResult<()>;

    async fn rename(&self, from: &Path, to: &Path) -> VfsResult<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    async fn symlink(&self, target: &Path, link: &Path) -> VfsResult<()>;

    /// Create a hard link at `link` to `original`.
    async fn link(&self, original: &Path, link: &Path) -> VfsResult<()>;

    async fn truncate(&self, path: &Path, size: u64) -> VfsResult<()>;

    async fn chmod(&self, path: &Path, mode: u32) -> VfsResult<()>;

    async fn chown(&self, path: &Path, uid: u32, gid: u32) -> VfsResult<()>;

    async fn chtimes(&self, path: &Path, atime: SystemTime, mtime: SystemTime) -> VfsResult<()>;

    // ========================================================================
    // Errors
    // ========================================================================

    /// Translate an error raised by this backend into a protocol status.
    fn status_from_error(&self, err: Option<&VfsError>) -> Status {
        status_from_error(err)
    }

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> bool {
        self.lstat(path).await.is_ok()
    }
}
