//! License banner and include guard normalization over a source tree.

mod banner;
mod guard;
mod transform;
mod walk;

pub use banner::Banner;
pub use guard::derive_guard;
pub use transform::{normalize_header, normalize_source, Normalized};
pub use walk::{collect_files, Candidate, FileKind};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::defaults::{self, LicenseConfig};
use crate::error::{Error, Result};
use crate::paths;
use crate::utils::io;

/// Resolved settings for one normalizer run.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub root: PathBuf,
    pub guard_prefix: String,
    pub header_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub banner: Banner,
    pub dry_run: bool,
}

impl NormalizeOptions {
    /// Build options from config. `root_override` replaces `license.root`;
    /// both are resolved against `project_root`.
    pub fn from_config(
        config: &LicenseConfig,
        project_root: &Path,
        root_override: Option<&str>,
        dry_run: bool,
    ) -> Result<Self> {
        let root = paths::resolve(project_root, root_override.unwrap_or(&config.root));

        let banner = match &config.banner_file {
            Some(file) => Banner::load(&paths::resolve(project_root, file))?,
            None => Banner::default(),
        };

        Ok(Self {
            root,
            guard_prefix: config.guard_prefix.clone(),
            header_extensions: config.header_extensions.clone(),
            source_extensions: config.source_extensions.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            banner,
            dry_run,
        })
    }
    /// Read `buildhelper.json` under `project_root` and build options from
    /// its `license` section. A missing file means defaults; an unreadable or
    /// invalid one is an error, since the run rewrites files with what it finds.
    pub fn for_project(
        project_root: &Path,
        root_override: Option<&str>,
        dry_run: bool,
    ) -> Result<Self> {
        let config = defaults::load_config_from_file(project_root)?.unwrap_or_default();
        Self::from_config(&config.license, project_root, root_override, dry_run)
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Modified,
    Failed,
}

/// A file that changed (or would change) or could not be processed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: String,
    pub kind: FileKind,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeSummary {
    pub scanned: u32,
    pub modified: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeReport {
    pub root: String,
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    pub summary: NormalizeSummary,
}

impl NormalizeReport {
    fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.display().to_string(),
            dry_run,
            files: Vec::new(),
            summary: NormalizeSummary::default(),
        }
    }

    fn record_modified(&mut self, candidate: &Candidate) {
        self.summary.modified += 1;
        self.files.push(FileOutcome {
            path: candidate.relative.clone(),
            kind: candidate.kind,
            status: FileStatus::Modified,
            error: None,
        });
    }

    fn record_failed(&mut self, candidate: &Candidate, error: String) {
        self.summary.failed += 1;
        self.files.push(FileOutcome {
            path: candidate.relative.clone(),
            kind: candidate.kind,
            status: FileStatus::Failed,
            error: Some(error),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

// ============================================================================
// Tree processing
// ============================================================================

/// Normalize one file on disk. Returns whether it changed (or would change).
fn process_file(candidate: &Candidate, options: &NormalizeOptions) -> Result<bool> {
    let text = io::read_file(&candidate.path, "read source file")?;

    let result = match candidate.kind {
        FileKind::Header => {
            let guard = derive_guard(&candidate.relative, &options.guard_prefix);
            normalize_header(&text, &options.banner, &guard)
        }
        FileKind::Source => normalize_source(&text, &options.banner),
    };

    if result.modified && !options.dry_run {
        io::write_file_atomic(&candidate.path, &result.text, "rewrite source file")?;
    }

    Ok(result.modified)
}

/// Normalize every header then every source under the configured root.
///
/// A file that cannot be read or written is recorded as failed and the run
/// continues. Fails as a whole only when the root is missing or the file
/// patterns are invalid.
pub fn normalize_tree(options: &NormalizeOptions) -> Result<NormalizeReport> {
    if !options.root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("Directory not found: {}", options.root.display()),
            None,
        ));
    }

    let candidates = collect_files(
        &options.root,
        &options.header_extensions,
        &options.source_extensions,
        &options.exclude_dirs,
    )?;

    let mut report = NormalizeReport::new(&options.root, options.dry_run);

    for candidate in &candidates {
        report.summary.scanned += 1;
        match process_file(candidate, options) {
            Ok(true) => {
                let verb = if options.dry_run { "would modify" } else { "modified" };
                log_status!("license", "{} {}", verb, candidate.relative);
                report.record_modified(candidate);
            }
            Ok(false) => {}
            Err(err) => {
                log_status!("license", "{} failed: {}", candidate.relative, err.describe());
                report.record_failed(candidate, err.describe());
            }
        }
    }

    log_status!(
        "license",
        "{} scanned, {} modified, {} failed",
        report.summary.scanned,
        report.summary.modified,
        report.summary.failed
    );

    Ok(report)
}
