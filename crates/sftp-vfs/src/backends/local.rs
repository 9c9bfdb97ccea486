//! Local filesystem backend.
//!
//! Passes every operation straight through to the host filesystem. Paths are
//! used as given: relative paths resolve against the process working
//! directory, exactly as the OS would.

use async_trait::async_trait;
use std::fs::{Metadata, Permissions};
use std::io;
use std::os::unix::fs::{FileExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

use crate::error::{VfsError, VfsResult};
use crate::ops::{Vfs, VfsFile};
use crate::path::clean_path_with_base;
use crate::types::{FileAttr, FileType, OpenFlags, StatFs};

/// Permissions for files created through [`Vfs::open_file`].
const CREATE_MODE: u32 = 0o644;

/// Pass-through backend over the host filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    read_only: bool,
}

impl LocalBackend {
    /// Create a writable pass-through backend.
    pub fn new() -> Self {
        Self { read_only: false }
    }

    /// Create a pass-through backend that rejects all mutation.
    pub fn new_read_only() -> Self {
        Self { read_only: true }
    }

    /// Set whether this filesystem is read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Check if write operations are allowed.
    fn check_writable(&self, op: &str, path: &Path) -> VfsResult<()> {
        if self.read_only {
            tracing::debug!(op, path = %path.display(), "rejected on read-only backend");
            Err(VfsError::Unsupported)
        } else {
            Ok(())
        }
    }
}

/// Final path component, or the whole path when there is none (`/`, `..`).
fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert std::fs::Metadata to FileAttr.
fn metadata_to_attr(name: String, meta: &Metadata) -> FileAttr {
    let file_type = meta.file_type();
    let kind = if file_type.is_dir() {
        FileType::Directory
    } else if file_type.is_symlink() {
        FileType::Symlink
    } else if file_type.is_file() {
        FileType::File
    } else {
        FileType::Other
    };

    FileAttr {
        name,
        size: meta.len(),
        kind,
        mode: meta.mode(),
        mtime: meta.modified().unwrap_or(UNIX_EPOCH),
        atime: meta.accessed().ok(),
        ctime: meta.created().ok(),
        nlink: Some(meta.nlink()),
        uid: Some(meta.uid()),
        gid: Some(meta.gid()),
    }
}

fn to_timespec(time: SystemTime) -> VfsResult<rustix::fs::Timespec> {
    let since = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| VfsError::Os(libc::EINVAL))?;
    Ok(rustix::fs::Timespec {
        tv_sec: since.as_secs() as _,
        tv_nsec: since.subsec_nanos() as _,
    })
}

#[async_trait]
impl Vfs for LocalBackend {
    async fn open_dir(&self, path: &Path) -> VfsResult<Box<dyn VfsFile>> {
        tracing::debug!(path = %path.display(), "open_dir");
        let file = std::fs::File::open(path).map_err(VfsError::at("opendir", path))?;
        let meta = file.metadata().map_err(VfsError::at("opendir", path))?;
        if !meta.is_dir() {
            return Err(VfsError::path(
                "opendir",
                path,
                io::Error::from_raw_os_error(libc::ENOTDIR),
            ));
        }
        Ok(Box::new(LocalFile::new(path, file, true, self.read_only)))
    }

    async fn open_file(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn VfsFile>> {
        tracing::debug!(path = %path.display(), ?flags, "open_file");
        if flags.is_mutating() {
            self.check_writable("open", path)?;
        }
        // POSIX allows O_CREAT/O_TRUNC on a read-only descriptor, std does not.
        if (flags.create || flags.truncate) && !(flags.write || flags.append) {
            return Err(VfsError::Unsupported);
        }

        let file = std::fs::OpenOptions::new()
            .read(flags.read)
            .write(flags.write)
            .append(flags.append)
            .truncate(flags.truncate)
            .create(flags.create && !flags.exclusive)
            .create_new(flags.create && flags.exclusive)
            .mode(CREATE_MODE)
            .open(path)
            .map_err(VfsError::at("open", path))?;
        Ok(Box::new(LocalFile::new(path, file, false, self.read_only)))
    }

    async fn stat(&self, path: &Path) -> VfsResult<FileAttr> {
        let meta = fs::metadata(path).await.map_err(VfsError::at("stat", path))?;
        Ok(metadata_to_attr(entry_name(path), &meta))
    }

    async fn lstat(&self, path: &Path) -> VfsResult<FileAttr> {
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(VfsError::at("lstat", path))?;
        Ok(metadata_to_attr(entry_name(path), &meta))
    }

    async fn readlink(&self, path: &Path) -> VfsResult<PathBuf> {
        fs::read_link(path).await.map_err(VfsError::at("readlink", path))
    }

    async fn real_path(&self, path: &Path) -> VfsResult<PathBuf> {
        let cwd = std::env::current_dir().map_err(VfsError::Io)?;
        let real = clean_path_with_base(&cwd, path);
        tracing::debug!(path = %path.display(), real = %real.display(), "real_path");
        Ok(real)
    }

    async fn statvfs(&self, path: &Path) -> VfsResult<StatFs> {
        let stat = rustix::fs::statvfs(path)
            .map_err(|e| VfsError::path("statvfs", path, e.into()))?;

        Ok(StatFs {
            blocks: stat.f_blocks as u64,
            bfree: stat.f_bfree as u64,
            bavail: stat.f_bavail as u64,
            files: stat.f_files as u64,
            ffree: stat.f_ffree as u64,
            favail: stat.f_favail as u64,
            bsize: stat.f_bsize as u64,
            frsize: stat.f_frsize as u64,
            fsid: stat.f_fsid as u64,
            flag: stat.f_flag.bits() as u64,
            namemax: stat.f_namemax as u64,
        })
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    async fn mkdir(&self, path: &Path, mode: u32) -> VfsResult<()> {
        self.check_writable("mkdir", path)?;
        let mut builder = fs::DirBuilder::new();
        builder.mode(mode);
        builder.create(path).await.map_err(VfsError::at("mkdir", path))
    }

    async fn remove(&self, path: &Path) -> VfsResult<()> {
        self.check_writable("remove", path)?;
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(VfsError::at("remove", path))?;
        if meta.is_dir() {
            fs::remove_dir(path).await.map_err(VfsError::at("remove", path))
        } else {
            fs::remove_file(path).await.map_err(VfsError::at("remove", path))
        }
    }

    async fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        self.check_writable("rename", from)?;
        fs::rename(from, to).await.map_err(VfsError::at("rename", from))
    }

    async fn symlink(&self, target: &Path, link: &Path) -> VfsResult<()> {
        self.check_writable("symlink", link)?;
        fs::symlink(target, link)
            .await
            .map_err(VfsError::at("symlink", link))
    }

    async fn link(&self, original: &Path, link: &Path) -> VfsResult<()> {
        self.check_writable("link", link)?;
        fs::hard_link(original, link)
            .await
            .map_err(VfsError::at("link", link))
    }

    async fn truncate(&self, path: &Path, size: u64) -> VfsResult<()> {
        self.check_writable("truncate", path)?;
        let file = fs::OpenOptions::new()
            .write(true)
            .open(path)
            .await
            .map_err(VfsError::at("truncate", path))?;
        file.set_len(size).await.map_err(VfsError::at("truncate", path))
    }

    async fn chmod(&self, path: &Path, mode: u32) -> VfsResult<()> {
        self.check_writable("chmod", path)?;
        fs::set_permissions(path, Permissions::from_mode(mode))
            .await
            .map_err(VfsError::at("chmod", path))
    }

    async fn chown(&self, path: &Path, uid: u32, gid: u32) -> VfsResult<()> {
        self.check_writable("chown", path)?;
        std::os::unix::fs::chown(path, Some(uid), Some(gid)).map_err(VfsError::at("chown", path))
    }

    async fn chtimes(&self, path: &Path, atime: SystemTime, mtime: SystemTime) -> VfsResult<()> {
        self.check_writable("chtimes", path)?;
        let times = rustix::fs::Timestamps {
            last_access: to_timespec(atime)?,
            last_modification: to_timespec(mtime)?,
        };
        rustix::fs::utimensat(rustix::fs::CWD, path, &times, rustix::fs::AtFlags::empty())
            .map_err(|e| VfsError::path("chtimes", path, e.into()))
    }
}

/// Directory enumeration state.
#[derive(Debug)]
enum Cursor {
    /// No page requested yet.
    Unopened,
    Reading(std::fs::ReadDir),
    Exhausted,
}

/// Handle onto a host file or directory.
#[derive(Debug)]
pub struct LocalFile {
    name: String,
    path: PathBuf,
    /// `None` once closed.
    file: Option<std::fs::File>,
    is_dir: bool,
    /// Handle attribute changes and writes are refused.
    read_only: bool,
    cursor: Cursor,
    /// Error hit after a partial page, reported on the next call.
    pending: Option<VfsError>,
    /// Pages delivered so far.
    pages: u64,
}

impl LocalFile {
    fn new(path: &Path, file: std::fs::File, is_dir: bool, read_only: bool) -> Self {
        Self {
            name: path.display().to_string(),
            path: path.to_path_buf(),
            file: Some(file),
            is_dir,
            read_only,
            cursor: Cursor::Unopened,
            pending: None,
            pages: 0,
        }
    }

    fn file(&self) -> VfsResult<&std::fs::File> {
        self.file.as_ref().ok_or(VfsError::Os(libc::EBADF))
    }

    fn check_writable(&self, op: &str) -> VfsResult<()> {
        if self.read_only {
            tracing::debug!(op, path = %self.path.display(), "rejected on read-only handle");
            Err(VfsError::Unsupported)
        } else {
            Ok(())
        }
    }

    fn check_not_dir(&self) -> VfsResult<()> {
        if self.is_dir {
            Err(VfsError::Unsupported)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VfsFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stat(&self) -> VfsResult<FileAttr> {
        let meta = self
            .file()?
            .metadata()
            .map_err(VfsError::at("stat", &self.path))?;
        Ok(metadata_to_attr(entry_name(&self.path), &meta))
    }

    async fn read_at(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        self.check_not_dir()?;
        let n = self
            .file()?
            .read_at(buf, offset)
            .map_err(VfsError::at("read", &self.path))?;
        if n == 0 && !buf.is_empty() {
            return Err(VfsError::Eof);
        }
        Ok(n)
    }

    async fn write_at(&self, buf: &[u8], offset: u64) -> VfsResult<usize> {
        self.check_not_dir()?;
        self.check_writable("write")?;
        self.file()?
            .write_all_at(buf, offset)
            .map_err(VfsError::at("write", &self.path))?;
        Ok(buf.len())
    }

    async fn chmod(&self, mode: u32) -> VfsResult<()> {
        self.check_writable("chmod")?;
        self.file()?
            .set_permissions(Permissions::from_mode(mode))
            .map_err(VfsError::at("chmod", &self.path))
    }

    async fn chown(&self, uid: u32, gid: u32) -> VfsResult<()> {
        self.check_writable("chown")?;
        std::os::unix::fs::fchown(self.file()?, Some(uid), Some(gid))
            .map_err(VfsError::at("chown", &self.path))
    }

    async fn truncate(&self, size: u64) -> VfsResult<()> {
        self.check_not_dir()?;
        self.check_writable("truncate")?;
        self.file()?
            .set_len(size)
            .map_err(VfsError::at("truncate", &self.path))
    }

    async fn readdir(&mut self, max_entries: usize) -> VfsResult<Vec<FileAttr>> {
        self.file()?;
        if !self.is_dir {
            return Err(VfsError::path(
                "readdir",
                &self.path,
                io::Error::from_raw_os_error(libc::ENOTDIR),
            ));
        }
        if let Some(err) = self.pending.take() {
            return Err(err);
        }

        if matches!(self.cursor, Cursor::Unopened) {
            let dir = std::fs::read_dir(&self.path).map_err(VfsError::at("readdir", &self.path))?;
            self.cursor = Cursor::Reading(dir);
        }
        let Cursor::Reading(dir) = &mut self.cursor else {
            return Err(VfsError::Eof);
        };

        let limit = if max_entries == 0 { usize::MAX } else { max_entries };
        let mut entries = Vec::new();
        let mut exhausted = false;
        while entries.len() < limit {
            let Some(entry) = dir.next() else {
                exhausted = true;
                break;
            };
            let result = entry
                .map_err(VfsError::at("readdir", &self.path))
                .and_then(|entry| match entry.metadata() {
                    Ok(meta) => Ok(Some(metadata_to_attr(
                        entry.file_name().to_string_lossy().into_owned(),
                        &meta,
                    ))),
                    // removed between listing and lstat
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(VfsError::path("readdir", entry.path(), e)),
                });
            match result {
                Ok(Some(attr)) => entries.push(attr),
                Ok(None) => {}
                Err(err) if entries.is_empty() => return Err(err),
                Err(err) => {
                    self.pending = Some(err);
                    break;
                }
            }
        }

        if exhausted {
            self.cursor = Cursor::Exhausted;
        }
        if entries.is_empty() {
            return Err(VfsError::Eof);
        }
        self.pages += 1;
        tracing::debug!(path = %self.path.display(), page = self.pages, count = entries.len(), "readdir");
        Ok(entries)
    }

    async fn close(&mut self) -> VfsResult<()> {
        if self.file.take().is_some() {
            tracing::debug!(path = %self.path.display(), "close");
        }
        self.cursor = Cursor::Exhausted;
        Ok(())
    }
}
