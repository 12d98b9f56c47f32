use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Config file name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "buildhelper.json";

/// Project root: the directory the tool is started from
pub fn project_root() -> Result<PathBuf> {
    env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
    })
}

/// Project-local buildhelper.json path
pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// CMake cache written by the configuration step
pub fn cmake_cache(build_dir: &Path) -> PathBuf {
    build_dir.join("CMakeCache.txt")
}

/// CTest file, present once a configure ran with testing enabled
pub fn ctest_file(build_dir: &Path) -> PathBuf {
    build_dir.join("CTestTestfile.cmake")
}

/// Emscripten toolchain file inside an SDK checkout
pub fn emscripten_toolchain(sdk: &Path) -> PathBuf {
    sdk.join("cmake")
        .join("Modules")
        .join("Platform")
        .join("Emscripten.cmake")
}

/// Expand `~` and make a configured path absolute against the project root.
/// Interior `.` segments are dropped.
pub fn resolve(root: &Path, configured: &str) -> PathBuf {
    let expanded = shellexpand::tilde(configured).to_string();
    let path = PathBuf::from(expanded);
    let joined = if path.is_absolute() {
        path
    } else {
        root.join(path)
    };
    joined.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_paths_to_root() {
        let root = Path::new("/work/project");
        assert_eq!(resolve(root, "build"), PathBuf::from("/work/project/build"));
        assert_eq!(resolve(root, "/tmp/out"), PathBuf::from("/tmp/out"));
        assert_eq!(resolve(root, "."), PathBuf::from("/work/project"));
        assert_eq!(resolve(root, "./src/./base"), PathBuf::from("/work/project/src/base"));
    }

    #[test]
    fn emscripten_toolchain_points_into_platform_modules() {
        let path = emscripten_toolchain(Path::new("/opt/emsdk"));
        assert!(path.ends_with("cmake/Modules/Platform/Emscripten.cmake"));
    }
}
