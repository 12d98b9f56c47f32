use std::env;
use std::path::{Path, PathBuf};

use super::configuration::BuildConfiguration;
use super::generator::{self, Generator, GeneratorCatalog};
use crate::defaults::BuildConfig;
use crate::error::Result;
use crate::paths;
use crate::process::{self, ProcessRunner};
use crate::terminal::Terminal;

/// Which out-of-source build directory a step works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Native,
    Cross,
}

/// Mutable state of one interactive session. Created at startup, changed
/// only by menu selections and configure refreshes, never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub title: String,
    pub root: PathBuf,
    pub build_dir: PathBuf,
    pub cross_build_dir: PathBuf,
    pub configuration: BuildConfiguration,
    pub generator: Generator,
    pub generators: GeneratorCatalog,
    pub testing_enabled: bool,
    pub testing_define: String,
    pub package_formats: Vec<String>,
    pub cross_package_format: String,
    /// Emscripten SDK, set only when the SDK path is known and `emcc` runs.
    pub cross_toolchain: Option<PathBuf>,
}

impl Session {
    /// Session with configured paths and no detection performed.
    pub fn new(root: &Path, config: &BuildConfig) -> Self {
        Self {
            title: config.title.clone(),
            root: root.to_path_buf(),
            build_dir: paths::resolve(root, &config.build_dir),
            cross_build_dir: paths::resolve(root, &config.cross_build_dir),
            configuration: BuildConfiguration::default(),
            generator: Generator::Default,
            generators: GeneratorCatalog::default(),
            testing_enabled: false,
            testing_define: config.testing_define.clone(),
            package_formats: config.package_formats.clone(),
            cross_package_format: config.cross_package_format.clone(),
            cross_toolchain: None,
        }
    }

    /// Startup sequence: verify CMake, look for the cross toolchain, discover
    /// generators, then read testing and generator state from the build dir.
    ///
    /// Fails only when CMake itself cannot be started.
    pub fn start(
        root: &Path,
        config: &BuildConfig,
        runner: &dyn ProcessRunner,
        term: &mut dyn Terminal,
    ) -> Result<Self> {
        if let Err(err) = process::probe(runner, "cmake") {
            term.say("CMake is not installed or properly setup. Please visit www.cmake.org.");
            return Err(err);
        }
        term.say("CMake is installed and setup properly.");

        let mut session = Self::new(root, config);

        let sdk = env::var(&config.toolchain_env).ok();
        session.cross_toolchain = detect_cross_toolchain(runner, term, sdk.as_deref());

        session.generators = GeneratorCatalog::discover(runner)?;
        session.detect_testing();
        session.refresh_generator();

        log_status!(
            "cmake",
            "{} generators available, current: {}",
            session.generators.len(),
            session.generator
        );

        Ok(session)
    }

    pub fn build_dir_for(&self, target: Target) -> &Path {
        match target {
            Target::Native => &self.build_dir,
            Target::Cross => &self.cross_build_dir,
        }
    }

    /// Generator used when building `target`.
    pub fn generator_for(&self, target: Target) -> Generator {
        match target {
            Target::Native => self.generator.clone(),
            Target::Cross => generator::cross_generator(),
        }
    }

    pub fn has_cross_toolchain(&self) -> bool {
        self.cross_toolchain.is_some()
    }

    /// Generator recorded in the native build cache.
    pub fn cached_generator(&self) -> Generator {
        generator::detect_generator(&self.build_dir, &self.generators)
    }

    /// Re-read the generator from the native build cache.
    pub fn refresh_generator(&mut self) {
        self.generator = self.cached_generator();
    }

    /// Testing is on when a previous configure produced a CTest file.
    pub fn detect_testing(&mut self) {
        self.testing_enabled = paths::ctest_file(&self.build_dir).is_file();
    }
}

/// Cross toolchain is usable when its SDK path is set and `emcc` can be run.
pub fn detect_cross_toolchain(
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
    sdk: Option<&str>,
) -> Option<PathBuf> {
    let sdk = sdk.map(str::trim).filter(|s| !s.is_empty())?;

    if process::probe(runner, "emcc").is_err() {
        term.say("Emscripten is not installed or properly setup.");
        return None;
    }

    term.say("Emscripten is installed and setup properly.");
    Some(PathBuf::from(shellexpand::tilde(sdk).to_string()))
}
