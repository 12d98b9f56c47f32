use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths;

/// Root configuration structure for buildhelper.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HelperConfig {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub license: LicenseConfig,
}

/// Settings for the interactive CMake menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    #[serde(default = "default_cross_build_dir")]
    pub cross_build_dir: String,

    /// CMake option switched on when testing is enabled (`-D <define>=1`)
    #[serde(default = "default_testing_define")]
    pub testing_define: String,

    #[serde(default = "default_package_formats")]
    pub package_formats: Vec<String>,

    #[serde(default = "default_cross_package_format")]
    pub cross_package_format: String,

    /// Environment variable holding the Emscripten SDK path
    #[serde(default = "default_toolchain_env")]
    pub toolchain_env: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            build_dir: default_build_dir(),
            cross_build_dir: default_cross_build_dir(),
            testing_define: default_testing_define(),
            package_formats: default_package_formats(),
            cross_package_format: default_cross_package_format(),
            toolchain_env: default_toolchain_env(),
        }
    }
}

/// Settings for the license header normalizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    #[serde(default = "default_license_root")]
    pub root: String,

    /// Namespace tag prepended to every derived include guard
    #[serde(default = "default_guard_prefix")]
    pub guard_prefix: String,

    #[serde(default = "default_header_extensions")]
    pub header_extensions: Vec<String>,

    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Directory names never descended into (third-party code, build output)
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_file: Option<String>,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            root: default_license_root(),
            guard_prefix: default_guard_prefix(),
            header_extensions: default_header_extensions(),
            source_extensions: default_source_extensions(),
            exclude_dirs: default_exclude_dirs(),
            banner_file: None,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_title() -> String {
    "ozz".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_cross_build_dir() -> String {
    "build-cc".to_string()
}

fn default_testing_define() -> String {
    "ozz_build_tests".to_string()
}

fn default_package_formats() -> Vec<String> {
    vec!["ZIP".to_string(), "TBZ2".to_string()]
}

fn default_cross_package_format() -> String {
    "ZIP".to_string()
}

fn default_toolchain_env() -> String {
    "EMSCRIPTEN".to_string()
}

fn default_license_root() -> String {
    ".".to_string()
}

fn default_guard_prefix() -> String {
    "OZZ".to_string()
}

fn default_header_extensions() -> Vec<String> {
    vec!["h".to_string()]
}

fn default_source_extensions() -> Vec<String> {
    vec!["cc".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["extern".to_string(), "build".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load buildhelper.json from the project root, falling back to built-in
/// defaults when the file is missing or invalid.
pub fn load_config(root: &Path) -> HelperConfig {
    match load_config_from_file(root) {
        Ok(Some(config)) => config,
        Ok(None) => HelperConfig::default(),
        Err(err) => {
            log_status!("config", "Ignoring {}: {}", paths::CONFIG_FILE_NAME, err.describe());
            HelperConfig::default()
        }
    }
}

/// Attempt to load config from buildhelper.json. `Ok(None)` when absent.
pub fn load_config_from_file(root: &Path) -> crate::Result<Option<HelperConfig>> {
    let path = paths::config_file(root);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: HelperConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    validate(&config)?;

    Ok(Some(config))
}

fn validate(config: &HelperConfig) -> crate::Result<()> {
    if config.build.build_dir.trim().is_empty() {
        return Err(crate::Error::config_invalid_value(
            "build.build_dir",
            None,
            "must not be empty",
        ));
    }
    if config.build.build_dir == config.build.cross_build_dir {
        return Err(crate::Error::config_invalid_value(
            "build.cross_build_dir",
            Some(config.build.cross_build_dir.clone()),
            "must differ from build.build_dir",
        ));
    }
    if config.license.header_extensions.is_empty() && config.license.source_extensions.is_empty()
    {
        return Err(crate::Error::config_invalid_value(
            "license",
            None,
            "at least one header or source extension is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_builtin_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.build.build_dir, "build");
        assert_eq!(config.build.cross_build_dir, "build-cc");
        assert_eq!(config.license.guard_prefix, "OZZ");
        assert_eq!(config.license.exclude_dirs, vec!["extern", "build"]);
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(paths::CONFIG_FILE_NAME),
            r#"{"build": {"title": "anim"}, "license": {"guard_prefix": "ANIM"}}"#,
        )
        .unwrap();

        let config = load_config_from_file(dir.path()).unwrap().unwrap();
        assert_eq!(config.build.title, "anim");
        assert_eq!(config.build.package_formats, vec!["ZIP", "TBZ2"]);
        assert_eq!(config.license.guard_prefix, "ANIM");
        assert_eq!(config.license.source_extensions, vec!["cc"]);
    }

    #[test]
    fn invalid_json_is_reported_and_load_config_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(paths::CONFIG_FILE_NAME), "{ not json").unwrap();

        let err = load_config_from_file(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");

        let config = load_config(dir.path());
        assert_eq!(config.build.title, "ozz");
    }

    #[test]
    fn identical_build_dirs_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(paths::CONFIG_FILE_NAME),
            r#"{"build": {"build_dir": "out", "cross_build_dir": "out"}}"#,
        )
        .unwrap();

        let err = load_config_from_file(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }
}
