//! Backend error to protocol status translation.
//!
//! Every backend funnels its errors through [`status_from_error`], so peers
//! see the same bounded vocabulary whichever backend or OS failed.

use crate::error::{VfsError, VfsResult};
use crate::status::{Status, StatusCode};

/// Translate an OS error number to a status code.
pub fn translate_errno(errno: i32) -> StatusCode {
    match errno {
        0 => StatusCode::Ok,
        libc::ENOENT => StatusCode::NoSuchFile,
        libc::EPERM | libc::EACCES => StatusCode::PermissionDenied,
        _ => StatusCode::Failure,
    }
}

/// Classify a backend error into a [`Status`].
///
/// `None` means the call succeeded and yields an OK status with an empty
/// message. Otherwise the message is the error's display text and the code
/// is decided by the first matching rule:
///
/// 1. [`VfsError::Unsupported`] -> `OpUnsupported`
/// 2. [`VfsError::Os`] -> errno table
/// 3. [`VfsError::Path`] -> errno table applied to the wrapped cause
/// 4. [`VfsError::Status`] -> the carried code, unchanged
/// 5. [`VfsError::Eof`] -> `Eof`
/// 6. [`VfsError::NotExist`] -> `NoSuchFile`
///
/// Anything else is `Failure`, except a bare [`VfsError::Io`] that still has
/// a raw OS code, which goes through the errno table.
pub fn status_from_error(err: Option<&VfsError>) -> Status {
    let Some(err) = err else {
        return Status::ok();
    };
    tracing::debug!(kind = err.kind_name(), error = ?err, "status_from_error");

    let code = match err {
        VfsError::Unsupported => StatusCode::OpUnsupported,
        VfsError::Os(errno) => translate_errno(*errno),
        VfsError::Path { source, .. } => {
            tracing::debug!(cause = ?source, "status_from_error: path error");
            source
                .raw_os_error()
                .map(translate_errno)
                .unwrap_or(StatusCode::Failure)
        }
        VfsError::Status(status) => status.code(),
        VfsError::Eof => StatusCode::Eof,
        VfsError::NotExist => StatusCode::NoSuchFile,
        VfsError::Io(e) => e
            .raw_os_error()
            .map(translate_errno)
            .unwrap_or(StatusCode::Failure),
        VfsError::Other(_) => StatusCode::Failure,
    };

    if code == StatusCode::Ok {
        return Status::ok();
    }
    Status::new(code, err.to_string())
}

/// Status for the outcome of a backend call.
pub fn status_from_result<T>(result: &VfsResult<T>) -> Status {
    status_from_error(result.as_ref().err())
}

impl From<&VfsError> for Status {
    fn from(err: &VfsError) -> Self {
        status_from_error(Some(err))
    }
}

impl From<VfsError> for Status {
    fn from(err: VfsError) -> Self {
        status_from_error(Some(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn code_of(err: VfsError) -> StatusCode {
        status_from_error(Some(&err)).code()
    }

    #[test]
    fn test_no_error_is_ok() {
        let status = status_from_error(None);
        assert_eq!(status.code(), StatusCode::Ok);
        assert_eq!(status.message(), "");
    }

    #[test]
    fn test_unsupported() {
        let status = status_from_error(Some(&VfsError::Unsupported));
        assert_eq!(status.code(), StatusCode::OpUnsupported);
        assert_eq!(status.message(), "operation unsupported");
    }

    #[test]
    fn test_errno_table() {
        assert_eq!(code_of(VfsError::Os(libc::ENOENT)), StatusCode::NoSuchFile);
        assert_eq!(code_of(VfsError::Os(libc::EPERM)), StatusCode::PermissionDenied);
        assert_eq!(code_of(VfsError::Os(libc::EACCES)), StatusCode::PermissionDenied);
        assert_eq!(code_of(VfsError::Os(0)), StatusCode::Ok);
        assert_eq!(status_from_error(Some(&VfsError::Os(0))), Status::ok());
        assert_eq!(code_of(VfsError::Os(libc::EIO)), StatusCode::Failure);
        assert_eq!(code_of(VfsError::Os(libc::ENOTEMPTY)), StatusCode::Failure);
    }

    #[test]
    fn test_path_error_matches_inner_errno() {
        for errno in [0, libc::ENOENT, libc::EPERM, libc::EACCES, libc::EEXIST, libc::EISDIR] {
            let wrapped = VfsError::path("stat", "/x", io::Error::from_raw_os_error(errno));
            assert_eq!(code_of(wrapped), translate_errno(errno), "errno {errno}");
        }
        let success = VfsError::path("stat", "/x", io::Error::from_raw_os_error(0));
        assert_eq!(status_from_error(Some(&success)).message(), "");
    }

    #[test]
    fn test_path_error_without_errno_is_failure() {
        let wrapped = VfsError::path("read", "/x", io::Error::other("synthetic"));
        assert_eq!(code_of(wrapped), StatusCode::Failure);
    }

    #[test]
    fn test_explicit_status_passes_through() {
        for code in [
            StatusCode::BadMessage,
            StatusCode::NoConnection,
            StatusCode::ConnectionLost,
            StatusCode::PermissionDenied,
        ] {
            let status = status_from_error(Some(&VfsError::Status(Status::new(code, "peer gone"))));
            assert_eq!(status.code(), code);
            assert_eq!(status.message(), "peer gone");
        }
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(code_of(VfsError::Eof), StatusCode::Eof);
        assert_eq!(code_of(VfsError::NotExist), StatusCode::NoSuchFile);
    }

    #[test]
    fn test_unclassified_is_failure() {
        let status = status_from_error(Some(&VfsError::other("backend exploded")));
        assert_eq!(status.code(), StatusCode::Failure);
        assert_eq!(status.message(), "backend exploded");

        assert_eq!(
            code_of(VfsError::Io(io::Error::new(io::ErrorKind::NotFound, "no errno"))),
            StatusCode::Failure
        );
        assert_eq!(
            code_of(VfsError::Io(io::Error::from_raw_os_error(libc::ENOENT))),
            StatusCode::NoSuchFile
        );
    }

    #[test]
    fn test_status_from_result() {
        let ok: VfsResult<u32> = Ok(3);
        assert!(status_from_result(&ok).is_ok());

        let err: VfsResult<u32> = Err(VfsError::Eof);
        assert_eq!(status_from_result(&err).code(), StatusCode::Eof);
    }
}
