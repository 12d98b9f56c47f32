//! CMake generator discovery and cache detection.

use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{Error, Result, ToolCommandFailedDetails};
use crate::paths;
use crate::process::{Invocation, ProcessRunner};

/// Generator passed to `cmake -G`, or CMake's own platform default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Generator {
    #[default]
    Default,
    Named(String),
}

impl Generator {
    pub fn named(name: impl Into<String>) -> Self {
        Generator::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Generator::Default => None,
            Generator::Named(name) => Some(name),
        }
    }

    /// Makefiles generators accept a `-j` worker hint after `--`.
    pub fn is_makefiles(&self) -> bool {
        self.name().is_some_and(|n| n.contains("Makefiles"))
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Default => f.write_str("default"),
            Generator::Named(name) => f.write_str(name),
        }
    }
}

/// Fixed generator used for the cross (Emscripten) build.
pub fn cross_generator() -> Generator {
    if cfg!(windows) {
        Generator::named("MinGW Makefiles")
    } else {
        Generator::named("Unix Makefiles")
    }
}

/// Numbered generator list shown by the selection sub-menu. Entry 0 is
/// always [`Generator::Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCatalog {
    entries: Vec<Generator>,
}

impl Default for GeneratorCatalog {
    fn default() -> Self {
        Self {
            entries: vec![Generator::Default],
        }
    }
}

impl GeneratorCatalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let generator = Generator::named(name);
            if !catalog.entries.contains(&generator) {
                catalog.entries.push(generator);
            }
        }
        catalog
    }

    /// Run `cmake --help` and collect the generators it lists.
    pub fn discover(runner: &dyn ProcessRunner) -> Result<Self> {
        let invocation = Invocation::new("cmake").arg("--help");
        let output = runner.output(&invocation)?;
        if !output.success {
            return Err(Error::tool_command_failed(ToolCommandFailedDetails {
                command: invocation.display(),
                exit_code: output.exit_code,
                working_dir: None,
            }));
        }
        Ok(Self::from_names(parse_help_generators(&output.stdout)))
    }

    pub fn entries(&self) -> &[Generator] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Generator> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known generator with this exact name.
    pub fn find(&self, name: &str) -> Option<&Generator> {
        self.entries.iter().find(|g| g.name() == Some(name))
    }
}

/// Extract generator names from `cmake --help` output.
///
/// Only the section after the last "Generators" heading is considered. Each
/// entry is `<name> = <description>`; long names wrap, leaving the `=` on the
/// following line. The `* ` default marker is stripped and `[arch]` entries
/// expand to their base, Win64 and ARM variants.
pub fn parse_help_generators(help: &str) -> Vec<String> {
    let section = match help.rfind("Generators") {
        Some(pos) => &help[pos..],
        None => return Vec::new(),
    };

    let mut names = Vec::new();
    let mut pending: Option<&str> = None;

    for line in section.lines() {
        let Some((left, _)) = line.split_once('=') else {
            let trimmed = line.trim();
            pending = (!trimmed.is_empty()).then_some(trimmed);
            continue;
        };

        let raw = match left.trim() {
            "" => pending.take(),
            name => Some(name),
        };
        pending = None;

        let Some(raw) = raw else {
            continue;
        };

        let name = raw.trim_start_matches('*').trim();
        if name.is_empty() {
            continue;
        }

        if let Some(base) = name.strip_suffix("[arch]") {
            let base = base.trim_end();
            names.push(base.to_string());
            names.push(format!("{} Win64", base));
            names.push(format!("{} ARM", base));
        } else {
            names.push(name.to_string());
        }
    }

    names
}

static CACHED_GENERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CMAKE_GENERATOR:INTERNAL=(.*)").unwrap());

/// Generator recorded in `<build_dir>/CMakeCache.txt`, if any.
pub fn read_cached_generator(build_dir: &Path) -> Option<String> {
    let content = fs::read_to_string(paths::cmake_cache(build_dir)).ok()?;

    CACHED_GENERATOR
        .captures(&content)
        .map(|cap| cap[1].trim_end().to_string())
        .filter(|name| !name.is_empty())
}

/// Generator currently configured in the build dir, restricted to the known
/// catalog. Anything else (no cache, unknown name) is [`Generator::Default`].
pub fn detect_generator(build_dir: &Path, catalog: &GeneratorCatalog) -> Generator {
    read_cached_generator(build_dir)
        .and_then(|name| catalog.find(&name).cloned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELP: &str = "Usage\n\n  cmake [options] <path-to-source>\n\n\
Options\n  -G <generator-name>          = Specify a build system generator.\n\n\
Generators\n\n\
The following generators are available on this platform (* marks default):\n\
* Unix Makefiles               = Generates standard UNIX makefiles.\n\
  Ninja                        = Generates build.ninja files.\n\
  Visual Studio 14 2015 [arch] = Generates Visual Studio 2015 project files.\n\
                                 Optional [arch] can be \"Win64\" or \"ARM\".\n\
  Sublime Text 2 - Unix Makefiles\n\
                               = Generates Sublime Text 2 project files.\n";

    #[test]
    fn parses_generators_after_last_heading() {
        let names = parse_help_generators(HELP);
        assert_eq!(
            names,
            vec![
                "Unix Makefiles",
                "Ninja",
                "Visual Studio 14 2015",
                "Visual Studio 14 2015 Win64",
                "Visual Studio 14 2015 ARM",
                "Sublime Text 2 - Unix Makefiles",
            ]
        );
    }

    #[test]
    fn help_without_generator_section_yields_nothing() {
        assert!(parse_help_generators("cmake version 3.28").is_empty());
    }

    #[test]
    fn catalog_starts_with_default_and_skips_duplicates() {
        let catalog = GeneratorCatalog::from_names(["Ninja", "Ninja", "Unix Makefiles"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0), Some(&Generator::Default));
        assert_eq!(catalog.get(1), Some(&Generator::named("Ninja")));
    }

    #[test]
    fn detects_known_generator_from_cache() {
        let dir = TempDir::new().unwrap();
        fs::write(
            paths::cmake_cache(dir.path()),
            "CMAKE_BUILD_TYPE:STRING=Release\nCMAKE_GENERATOR:INTERNAL=Ninja\n",
        )
        .unwrap();

        let catalog = GeneratorCatalog::from_names(["Unix Makefiles", "Ninja"]);
        assert_eq!(
            detect_generator(dir.path(), &catalog),
            Generator::named("Ninja")
        );
    }

    #[test]
    fn unknown_or_missing_cache_is_default() {
        let dir = TempDir::new().unwrap();
        let catalog = GeneratorCatalog::from_names(["Ninja"]);
        assert_eq!(detect_generator(dir.path(), &catalog), Generator::Default);

        fs::write(
            paths::cmake_cache(dir.path()),
            "CMAKE_GENERATOR:INTERNAL=Xcode\n",
        )
        .unwrap();
        assert_eq!(detect_generator(dir.path(), &catalog), Generator::Default);
        assert_eq!(
            read_cached_generator(dir.path()),
            Some("Xcode".to_string())
        );
    }

    #[test]
    fn makefiles_detection() {
        assert!(Generator::named("Unix Makefiles").is_makefiles());
        assert!(Generator::named("MinGW Makefiles").is_makefiles());
        assert!(!Generator::named("Ninja").is_makefiles());
        assert!(!Generator::Default.is_makefiles());
        assert_eq!(Generator::Default.to_string(), "default");
    }
}
