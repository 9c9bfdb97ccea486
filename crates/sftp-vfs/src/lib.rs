//! Virtual filesystem layer for SFTP servers.
//!
//! The protocol layer holds exactly one backend and calls it once per
//! request. Key components:
//!
//! - [`Vfs`] - Operations a storage backend exposes
//! - [`VfsFile`] - An open file or directory handle
//! - [`status_from_error`] - Maps any backend error to a protocol [`Status`]
//! - [`LocalBackend`] - Pass-through to the host filesystem
//! - [`DemoBackend`] - Inert single-directory backend that rejects mutation
//! - [`VfsConfig`] - Picks and builds the backend from TOML
//!
//! ## Design Decisions
//!
//! - **One translator**: backends differ in which errors they raise, not in
//!   how errors become statuses, so every backend's
//!   [`Vfs::status_from_error`] goes through the same function.
//! - **Unsupported is not denied**: policy refusals use
//!   [`VfsError::Unsupported`] so peers can tell them apart from OS
//!   permission failures.
//! - **Cursor lives in the handle**: `readdir` takes `&mut self`, so a
//!   listing is paged by exactly one owner.

pub mod backends;
mod config;
mod error;
mod ops;
mod path;
mod status;
mod translate;
mod types;

pub use backends::{DemoBackend, LocalBackend};
pub use config::{BackendKind, ConfigError, VfsConfig};
pub use error::{VfsError, VfsResult};
pub use ops::{Vfs, VfsFile};
pub use path::{clean_path, clean_path_with_base};
pub use status::{Status, StatusCode};
pub use translate::{status_from_error, status_from_result, translate_errno};
pub use types::{FileAttr, FileType, OpenFlags, StatFs};
