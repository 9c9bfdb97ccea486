//! Drives backends the way a protocol layer does: one injected
//! `Arc<dyn Vfs>`, one call per request, errors turned into statuses.

use std::path::Path;
use std::sync::{Arc, Once};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use sftp_vfs::{OpenFlags, Status, StatusCode, Vfs, VfsConfig, VfsError};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_test_writer()
            .try_init();
    });
}

fn backend(toml: &str) -> Arc<dyn Vfs> {
    init_tracing();
    VfsConfig::from_toml_str(toml).unwrap().build()
}

/// List a whole directory the way an SFTP READDIR loop does.
async fn list_all(vfs: &dyn Vfs, path: &Path) -> (Vec<String>, Status) {
    let mut handle = match vfs.open_dir(path).await {
        Ok(h) => h,
        Err(e) => return (Vec::new(), vfs.status_from_error(Some(&e))),
    };
    let mut names = Vec::new();
    let status = loop {
        match handle.readdir(2).await {
            Ok(page) => names.extend(page.into_iter().map(|e| e.name)),
            Err(e) => break vfs.status_from_error(Some(&e)),
        }
    };
    handle.close().await.unwrap();
    names.sort();
    (names, status)
}

#[tokio::test]
async fn test_local_listing_ends_with_eof() {
    let vfs = backend("backend = \"local\"");
    let dir = TempDir::new().unwrap();
    for name in ["one", "two", "three"] {
        std::fs::write(dir.path().join(name), name).unwrap();
    }

    let (names, status) = list_all(vfs.as_ref(), dir.path()).await;
    assert_eq!(names, ["one", "three", "two"]);
    assert_eq!(status.code(), StatusCode::Eof);
}

#[tokio::test]
async fn test_demo_listing() {
    let vfs = backend("backend = \"demo\"");
    let (names, status) = list_all(vfs.as_ref(), Path::new("/whatever")).await;
    assert_eq!(names, ["bob"]);
    assert_eq!(status.code(), StatusCode::Eof);
}

#[tokio::test]
async fn test_missing_directory_status() {
    let vfs = backend("");
    let dir = TempDir::new().unwrap();
    let (names, status) = list_all(vfs.as_ref(), &dir.path().join("gone")).await;
    assert!(names.is_empty());
    assert_eq!(status.code(), StatusCode::NoSuchFile);
    assert!(!status.message().is_empty());
}

#[tokio::test]
async fn test_unsupported_is_uniform_across_backends() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("new-dir");

    for toml in ["backend = \"demo\"", "backend = \"local\"\nread_only = true"] {
        let vfs = backend(toml);
        let err = vfs.mkdir(&target, 0o755).await.unwrap_err();
        let status = vfs.status_from_error(Some(&err));
        assert_eq!(status.code(), StatusCode::OpUnsupported, "{toml}");
    }
    assert!(!target.exists());
}

#[tokio::test]
async fn test_upload_then_download() {
    let vfs = backend("backend = \"local\"");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upload.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let flags = OpenFlags::from_posix(libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC);
    let mut writer = vfs.open_file(&path, flags).await.unwrap();
    for (i, chunk) in payload.chunks(4096).enumerate() {
        let written = writer.write_at(chunk, (i * 4096) as u64).await.unwrap();
        assert_eq!(written, chunk.len());
    }
    writer.close().await.unwrap();

    let mut reader = vfs.open_file(&path, OpenFlags::read()).await.unwrap();
    let mut downloaded = Vec::new();
    let mut buf = vec![0u8; 3000];
    let status = loop {
        match reader.read_at(&mut buf, downloaded.len() as u64).await {
            Ok(n) => downloaded.extend_from_slice(&buf[..n]),
            Err(e) => break vfs.status_from_error(Some(&e)),
        }
    };
    reader.close().await.unwrap();

    assert_eq!(status.code(), StatusCode::Eof);
    assert_eq!(downloaded, payload);
}

#[tokio::test]
async fn test_success_maps_to_ok() {
    let vfs = backend("");
    let dir = TempDir::new().unwrap();
    let result = vfs.mkdir(&dir.path().join("made"), 0o700).await;
    let status = vfs.status_from_error(result.as_ref().err());
    assert!(status.is_ok());
    assert_eq!(status.message(), "");
}

#[tokio::test]
async fn test_explicit_status_from_backend() {
    let vfs = backend("");
    let err = VfsError::Status(Status::new(StatusCode::ConnectionLost, "peer hung up"));
    let status = vfs.status_from_error(Some(&err));
    assert_eq!(status.code(), StatusCode::ConnectionLost);
    assert_eq!(status.message(), "peer hung up");
}
