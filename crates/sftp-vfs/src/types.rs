//! Core VFS types.
//!
//! These describe entries and open intent independently of any backend, so
//! synthetic entries and real `std::fs::Metadata` end up in the same shape.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Device, socket, fifo.
    Other,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        matches!(self, FileType::Symlink)
    }

    /// POSIX `S_IFMT` bits for this type.
    pub fn mode_bits(&self) -> u32 {
        match self {
            FileType::File => libc::S_IFREG as u32,
            FileType::Directory => libc::S_IFDIR as u32,
            FileType::Symlink => libc::S_IFLNK as u32,
            FileType::Other => 0,
        }
    }
}

/// Metadata for one filesystem entry.
///
/// `uid`, `gid`, `atime`, `ctime` and `nlink` are backend-specific: the local
/// backend fills them from the OS, synthetic entries leave them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttr {
    /// Entry name (final path component).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// POSIX mode: type bits plus permissions (e.g. `0o100644`).
    pub mode: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last access time (optional).
    pub atime: Option<SystemTime>,
    /// Status change / creation time (optional).
    pub ctime: Option<SystemTime>,
    /// Number of hard links.
    pub nlink: Option<u64>,
    /// User ID (optional, for local fs).
    pub uid: Option<u32>,
    /// Group ID (optional, for local fs).
    pub gid: Option<u32>,
}

impl FileAttr {
    /// Attributes for a synthetic directory entry.
    pub fn directory(name: impl Into<String>, size: u64, perm: u32) -> Self {
        Self::synthetic(name, FileType::Directory, size, perm)
    }

    /// Attributes for a synthetic regular file.
    pub fn file(name: impl Into<String>, size: u64, perm: u32) -> Self {
        Self::synthetic(name, FileType::File, size, perm)
    }

    fn synthetic(name: impl Into<String>, kind: FileType, size: u64, perm: u32) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
            mode: kind.mode_bits() | (perm & 0o7777),
            mtime: SystemTime::now(),
            atime: None,
            ctime: None,
            nlink: None,
            uid: None,
            gid: None,
        }
    }

    /// Permission bits only.
    pub fn perm(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }
}

/// Filesystem statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatFs {
    /// Total blocks.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Available blocks (to non-root).
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Available inodes (to non-root).
    pub favail: u64,
    /// Block size.
    pub bsize: u64,
    /// Fragment size.
    pub frsize: u64,
    /// Filesystem ID.
    pub fsid: u64,
    /// Mount flags (`ST_RDONLY`, `ST_NOSUID`).
    pub flag: u64,
    /// Maximum name length.
    pub namemax: u64,
}

/// Open file flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
    /// Read access requested.
    pub read: bool,
    /// Write access requested.
    pub write: bool,
    /// Append mode.
    pub append: bool,
    /// Create if not exists.
    pub create: bool,
    /// Truncate on open.
    pub truncate: bool,
    /// Exclusive create (fail if exists).
    pub exclusive: bool,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
            exclusive: false,
        }
    }
}

impl OpenFlags {
    /// Read-only access.
    pub fn read() -> Self {
        Self::default()
    }

    /// Write access (also enables read).
    pub fn write() -> Self {
        Self {
            read: true,
            write: true,
            ..Default::default()
        }
    }

    /// Create with write access.
    pub fn create() -> Self {
        Self {
            read: true,
            write: true,
            create: true,
            ..Default::default()
        }
    }

    /// Decode POSIX `O_*` open flags.
    ///
    /// The access mode (`O_RDONLY`, `O_WRONLY`, `O_RDWR`) decides read/write;
    /// `O_APPEND`, `O_CREAT`, `O_TRUNC` and `O_EXCL` map one-to-one. Other bits
    /// are ignored.
    pub fn from_posix(flags: i32) -> Self {
        let (read, write) = match flags & libc::O_ACCMODE {
            libc::O_WRONLY => (false, true),
            libc::O_RDWR => (true, true),
            _ => (true, false),
        };
        Self {
            read,
            write,
            append: flags & libc::O_APPEND != 0,
            create: flags & libc::O_CREAT != 0,
            truncate: flags & libc::O_TRUNC != 0,
            exclusive: flags & libc::O_EXCL != 0,
        }
    }

    /// Returns true if any of the flags can modify storage.
    pub fn is_mutating(&self) -> bool {
        self.write || self.append || self.create || self.truncate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type() {
        assert!(FileType::File.is_file());
        assert!(!FileType::File.is_dir());
        assert!(FileType::Directory.is_dir());
        assert!(FileType::Symlink.is_symlink());
        assert!(!FileType::Other.is_file());
    }

    #[test]
    fn test_synthetic_attr() {
        let dir = FileAttr::directory("bob", 10, 0o755);
        assert!(dir.is_dir());
        assert_eq!(dir.name, "bob");
        assert_eq!(dir.size, 10);
        assert_eq!(dir.perm(), 0o755);
        assert_eq!(dir.mode & libc::S_IFMT as u32, libc::S_IFDIR as u32);

        let file = FileAttr::file("a.txt", 3, 0o100644);
        assert!(file.is_file());
        assert_eq!(file.perm(), 0o644);
        assert!(file.uid.is_none());
    }

    #[test]
    fn test_open_flags_from_posix() {
        let ro = OpenFlags::from_posix(libc::O_RDONLY);
        assert_eq!(ro, OpenFlags::read());
        assert!(!ro.is_mutating());

        let wo = OpenFlags::from_posix(libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC);
        assert!(!wo.read);
        assert!(wo.write && wo.create && wo.truncate);
        assert!(!wo.exclusive);

        let rw = OpenFlags::from_posix(libc::O_RDWR | libc::O_APPEND | libc::O_EXCL);
        assert!(rw.read && rw.write && rw.append && rw.exclusive);
        assert!(rw.is_mutating());
    }
}
