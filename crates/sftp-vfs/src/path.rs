//! Lexical path canonicalization.

use std::path::{Component, Path, PathBuf};

/// Normalize `path` to an absolute path rooted at `/`.
///
/// Relative paths are taken relative to `/`. `.` segments are dropped and
/// `..` pops the previous segment, never climbing above the root. Purely
/// lexical: symlinks are not consulted and the path need not exist.
pub fn clean_path(path: &Path) -> PathBuf {
    clean_path_with_base(Path::new("/"), path)
}

/// Like [`clean_path`], but relative paths are resolved against `base`.
pub fn clean_path_with_base(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut result = PathBuf::from("/");
    for component in joined.components() {
        match component {
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(s) => result.push(s),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("")), Path::new("/"));
        assert_eq!(clean_path(Path::new(".")), Path::new("/"));
        assert_eq!(clean_path(Path::new("a/../b")), Path::new("/b"));
        assert_eq!(clean_path(Path::new("/a/./b/")), Path::new("/a/b"));
        assert_eq!(clean_path(Path::new("/../../etc")), Path::new("/etc"));
        assert_eq!(clean_path(Path::new("//a//b")), Path::new("/a/b"));
    }

    #[test]
    fn test_clean_path_with_base() {
        let base = Path::new("/home/amy");
        assert_eq!(clean_path_with_base(base, Path::new("x/../y")), Path::new("/home/amy/y"));
        assert_eq!(clean_path_with_base(base, Path::new("..")), Path::new("/home"));
        assert_eq!(clean_path_with_base(base, Path::new("/tmp/z")), Path::new("/tmp/z"));
    }
}
