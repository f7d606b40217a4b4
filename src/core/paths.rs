//! Path normalization utilities
//!
//! Ensures all emitted paths use '/' as separator and are relative to root.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Resolve a user-supplied path against root unless it is absolute
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Display name for a path: relative to root when possible
pub fn display_name(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Check whether a path has one of the given extensions (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("notes/a.txt")), "notes/a.txt");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        assert_eq!(
            make_relative(Path::new("/project/notes/a.txt"), root),
            Some("notes/a.txt".to_string())
        );
        assert_eq!(make_relative(Path::new("/other/a.txt"), root), None);
    }

    #[test]
    fn test_resolve() {
        let root = Path::new("/project");
        assert_eq!(resolve(root, Path::new("a.txt")), PathBuf::from("/project/a.txt"));
        assert_eq!(resolve(root, Path::new("/tmp/a.txt")), PathBuf::from("/tmp/a.txt"));
    }

    #[test]
    fn test_display_name() {
        let root = Path::new("/project");
        assert_eq!(display_name(Path::new("/project/a.txt"), root), "a.txt");
        assert_eq!(display_name(Path::new("/tmp/b.txt"), root), "/tmp/b.txt");
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["txt".to_string()];
        assert!(has_extension(Path::new("a.txt"), &exts));
        assert!(has_extension(Path::new("A.TXT"), &exts));
        assert!(!has_extension(Path::new("a.md"), &exts));
        assert!(!has_extension(Path::new("txt"), &exts));
    }
}
