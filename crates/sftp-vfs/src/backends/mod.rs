//! VFS backends.
//!
//! Backends implement [`Vfs`](crate::Vfs) for different storage types.

mod demo;
mod local;

pub use demo::{DemoBackend, DemoFile, DEMO_ENTRY_NAME, DEMO_ENTRY_SIZE};
pub use local::{LocalBackend, LocalFile};
