//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers see either the old content or the new content, never a partial
/// write, and a failed write leaves the original untouched. An existing
/// target keeps its permission bits; a read-only target is refused.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let existing = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(Error::internal_io(e.to_string(), Some(operation.to_string()))),
    };

    if existing.as_ref().is_some_and(|perms| perms.readonly()) {
        return Err(Error::internal_io(
            format!("File is read-only: {}", path.display()),
            Some(operation.to_string()),
        ));
    }

    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    if let Some(perms) = existing {
        fs::set_permissions(&tmp_path, perms).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::internal_io(e.to_string(), Some(format!("{} (permissions)", operation)))
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })?;

    Ok(())
}

/// Create a directory and its parents. Returns `true` if it had to be created.
pub fn ensure_dir(path: &Path, operation: &str) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    Ok(true)
}

/// Remove a directory tree. Returns `true` if something was removed.
pub fn remove_dir_if_exists(path: &Path, operation: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_dir_all(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.h"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.h");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new", "test write").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("a.h.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_file_atomic_keeps_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool.cc");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        write_file_atomic(&path, "new", "test write").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_file_atomic_refuses_read_only_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ro.cc");
        fs::write(&path, "old").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let err = write_file_atomic(&path, "new", "test write").unwrap_err();

        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!dir.path().join("ro.cc.tmp").exists());
    }

    #[test]
    fn write_file_atomic_fails_for_missing_parent() {
        let result = write_file_atomic(Path::new("/nonexistent/dir/a.h"), "x", "test write");
        assert!(result.is_err());
    }

    #[test]
    fn ensure_dir_is_noop_when_present() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");

        assert!(ensure_dir(&build, "mkdir").unwrap());
        assert!(!ensure_dir(&build, "mkdir").unwrap());
        assert!(build.is_dir());
    }

    #[test]
    fn remove_dir_if_exists_handles_missing_dir() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        assert!(!remove_dir_if_exists(&build, "rm").unwrap());

        fs::create_dir_all(build.join("nested")).unwrap();
        assert!(remove_dir_if_exists(&build, "rm").unwrap());
        assert!(!build.exists());
    }
}
