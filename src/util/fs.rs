//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Create an empty file if it does not exist, leaving existing content alone.
pub fn touch(path: &Path) -> std::io::Result<()> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve a path relative to `base` unless it is already absolute.
pub fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a relative path with `/` separators, `""` for the base itself.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absolute() {
        assert_eq!(absolute(Path::new("/a"), Path::new("b")), PathBuf::from("/a/b"));
        assert_eq!(absolute(Path::new("/a"), Path::new("/b")), PathBuf::from("/b"));
    }

    #[test]
    fn test_touch_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("go_asm.h");

        touch(&file).unwrap();
        assert!(file.exists());
        assert_eq!(fs::read_to_string(&file).unwrap(), "");

        fs::write(&file, "#define X 1\n").unwrap();
        touch(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "#define X 1\n");
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a/b/BUILD");

        write_string(&file, "x").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    }

    #[test]
    fn test_relative_and_slash_path() {
        let rel = relative_path(Path::new("/src"), Path::new("/src/internal/util"));
        assert_eq!(slash_path(&rel), "internal/util");
        assert_eq!(slash_path(&relative_path(Path::new("/src"), Path::new("/src"))), "");
    }
}
