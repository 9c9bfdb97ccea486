//! VFS error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::status::Status;

/// VFS error type.
///
/// Each variant is one error shape the status translator knows how to
/// classify. Backends should pick the most specific variant available.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Operation refused by backend policy (demo or read-only backend).
    #[error("operation unsupported")]
    Unsupported,

    /// Raw OS error number.
    #[error("{}", io::Error::from_raw_os_error(*.0))]
    Os(i32),

    /// An OS-level failure while operating on a path.
    #[error("{op} {}: {source}", .path.display())]
    Path {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend already knows which status to report.
    #[error(transparent)]
    Status(#[from] Status),

    /// End of data (exhausted directory cursor, read past end).
    #[error("end of file")]
    Eof,

    /// Entry does not exist (higher-level existence check, not an errno).
    #[error("file does not exist")]
    NotExist,

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl VfsError {
    /// Wrap an I/O error with the operation and path that produced it.
    pub fn path(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Path {
            op,
            path: path.into(),
            source,
        }
    }

    /// Adapter for `map_err` on path operations.
    pub fn at(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::path(op, path, source)
    }

    /// Create an Other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            VfsError::Unsupported => "unsupported",
            VfsError::Os(_) => "os",
            VfsError::Path { .. } => "path",
            VfsError::Status(_) => "status",
            VfsError::Eof => "eof",
            VfsError::NotExist => "not_exist",
            VfsError::Io(_) => "io",
            VfsError::Other(_) => "other",
        }
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::Unsupported => io::Error::new(io::ErrorKind::Unsupported, "operation unsupported"),
            VfsError::Os(code) => io::Error::from_raw_os_error(code),
            VfsError::Path { source, .. } => source,
            VfsError::Status(status) => io::Error::other(status),
            VfsError::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, "end of file"),
            VfsError::NotExist => io::Error::new(io::ErrorKind::NotFound, "file does not exist"),
            VfsError::Io(e) => e,
            VfsError::Other(msg) => io::Error::other(msg),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_message() {
        let err = VfsError::path(
            "open",
            "/srv/missing",
            io::Error::from_raw_os_error(libc::ENOENT),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("open /srv/missing: "), "got {msg}");
        assert_eq!(err.kind_name(), "path");
    }

    #[test]
    fn test_into_io_error() {
        let io_err: io::Error = VfsError::Os(libc::EACCES).into();
        assert_eq!(io_err.raw_os_error(), Some(libc::EACCES));

        let io_err: io::Error = VfsError::Unsupported.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Unsupported);

        let io_err: io::Error = VfsError::NotExist.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }
}
