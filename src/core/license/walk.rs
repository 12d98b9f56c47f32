use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Header,
    Source,
}

/// A file selected for normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative: String,
    pub kind: FileKind,
}

/// Relative path with `/` separators, or `None` when `path` is not under `root`.
fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

fn is_excluded(relative: &str, exclude_dirs: &[String]) -> bool {
    let mut segments: Vec<&str> = relative.split('/').collect();
    segments.pop();
    segments
        .iter()
        .any(|segment| exclude_dirs.iter().any(|dir| dir == segment))
}

fn is_hidden(relative: &str) -> bool {
    relative.split('/').any(|segment| segment.starts_with('.'))
}

/// True when `path` is reached through a symbolic link below `real_root`,
/// either the file itself or one of its parent directories.
fn is_linked(real_root: &Path, relative: &str, path: &Path) -> bool {
    match fs::canonicalize(path) {
        Ok(real) => real != real_root.join(relative),
        Err(_) => true,
    }
}

fn glob_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        glob::Pattern::escape(extension)
    );

    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };

    let entries = glob::glob_with(&pattern, options).map_err(|e| {
        Error::validation_invalid_argument(
            "extension",
            format!("Invalid file pattern '{}': {}", pattern, e),
            Some(vec![extension.to_string()]),
        )
    })?;

    Ok(entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                log_status!("license", "Skipping {}: {}", err.path().display(), err.error());
                None
            }
        })
        .filter(|p| p.is_file())
        .collect())
}

/// Recursively collect headers then sources under `root`, skipping hidden
/// entries and any file below a directory named in `exclude_dirs`. Files
/// reached through a symbolic link are skipped so each file is rewritten once,
/// under its real path. Each group is sorted by path.
pub fn collect_files(
    root: &Path,
    header_extensions: &[String],
    source_extensions: &[String],
    exclude_dirs: &[String],
) -> Result<Vec<Candidate>> {
    let groups = [
        (FileKind::Header, header_extensions),
        (FileKind::Source, source_extensions),
    ];

    let real_root = fs::canonicalize(root)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("resolve {}", root.display()))))?;

    let mut candidates = Vec::new();
    for (kind, extensions) in groups {
        let mut group = Vec::new();
        for ext in extensions {
            for path in glob_files(root, ext)? {
                let Some(relative) = relative_to(root, &path) else {
                    continue;
                };
                if is_hidden(&relative) || is_excluded(&relative, exclude_dirs) {
                    continue;
                }
                if is_linked(&real_root, &relative, &path) {
                    log_status!("license", "Skipping linked path {}", relative);
                    continue;
                }
                group.push(Candidate {
                    path,
                    relative,
                    kind,
                });
            }
        }
        group.sort_by(|a, b| a.relative.cmp(&b.relative));
        group.dedup_by(|a, b| a.path == b.path);
        candidates.extend(group);
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn headers_come_before_sources() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/a.cc");
        touch(dir.path(), "include/z.h");
        touch(dir.path(), "include/sub/b.h");

        let files = collect_files(
            dir.path(),
            &strings(&["h"]),
            &strings(&["cc"]),
            &[],
        )
        .unwrap();

        let names: Vec<&str> = files.iter().map(|c| c.relative.as_str()).collect();
        assert_eq!(names, vec!["include/sub/b.h", "include/z.h", "src/a.cc"]);
        assert_eq!(files[0].kind, FileKind::Header);
        assert_eq!(files[2].kind, FileKind::Source);
    }

    #[test]
    fn excluded_directories_are_skipped_at_any_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "extern/gtest/gtest.h");
        touch(dir.path(), "samples/build/gen.h");
        touch(dir.path(), "include/build.h");

        let files = collect_files(
            dir.path(),
            &strings(&["h"]),
            &[],
            &strings(&["extern", "build"]),
        )
        .unwrap();

        let names: Vec<&str> = files.iter().map(|c| c.relative.as_str()).collect();
        assert_eq!(names, vec!["include/build.h"]);
    }

    #[test]
    fn hidden_directories_and_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".cache/x.h");
        touch(dir.path(), "include/.scratch.h");
        touch(dir.path(), "include/a.h");

        let files = collect_files(dir.path(), &strings(&["h"]), &[], &[]).unwrap();

        let names: Vec<&str> = files.iter().map(|c| c.relative.as_str()).collect();
        assert_eq!(names, vec!["include/a.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real/a.h");
        fs::create_dir_all(dir.path().join("inc")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("real/a.h"),
            dir.path().join("inc/link.h"),
        )
        .unwrap();

        let files = collect_files(dir.path(), &strings(&["h"]), &[], &[]).unwrap();

        let names: Vec<&str> = files.iter().map(|c| c.relative.as_str()).collect();
        assert_eq!(names, vec!["real/a.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn files_below_linked_directory_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real/a.h");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let files = collect_files(dir.path(), &strings(&["h"]), &[], &[]).unwrap();

        let names: Vec<&str> = files.iter().map(|c| c.relative.as_str()).collect();
        assert_eq!(names, vec!["real/a.h"]);
    }

    #[test]
    fn directories_matching_extension_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("weird.h")).unwrap();
        touch(dir.path(), "real.h");

        let files = collect_files(dir.path(), &strings(&["h"]), &[], &[]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "real.h");
    }
}
