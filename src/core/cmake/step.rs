//! Individual menu actions.
//!
//! A [`Step`] reports success or failure; a failure stops the rest of the
//! sequence it belongs to. `Err` is reserved for unexpected conditions
//! (a tool that cannot be started, an I/O error) and is caught by the menu.

use super::configuration::BuildConfiguration;
use super::generator::Generator;
use super::session::{Session, Target};
use crate::error::{Error, Result};
use crate::utils::io;
use crate::paths;
use crate::process::{self, Invocation, ProcessRunner};
use crate::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    MakeBuildDir(Target),
    CleanBuildDir,
    Configure,
    ConfigureCross,
    Build(Target),
    Test,
    PackSources(String),
    PackBinaries(String, Target),
    EnableTesting,
    SelectConfiguration,
    SelectGenerator,
    ClearScreen,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed,
    Quit,
}

impl StepOutcome {
    fn from_success(success: bool) -> Self {
        if success {
            StepOutcome::Succeeded
        } else {
            StepOutcome::Failed
        }
    }
}

impl Step {
    pub fn execute(
        &self,
        session: &mut Session,
        runner: &dyn ProcessRunner,
        term: &mut dyn Terminal,
    ) -> Result<StepOutcome> {
        match self {
            Step::MakeBuildDir(target) => make_build_dir(session, *target, term),
            Step::CleanBuildDir => clean_build_dirs(session, term),
            Step::Configure => configure(session, runner, term),
            Step::ConfigureCross => configure_cross(session, runner, term),
            Step::Build(target) => build(session, *target, runner, term),
            Step::Test => test(session, runner, term),
            Step::PackSources(format) => pack_sources(session, format, runner, term),
            Step::PackBinaries(format, target) => {
                pack_binaries(session, format, *target, runner, term)
            }
            Step::EnableTesting => enable_testing(session, term),
            Step::SelectConfiguration => select_configuration(session, term),
            Step::SelectGenerator => select_generator(session, term),
            Step::ClearScreen => {
                term.clear();
                Ok(StepOutcome::Succeeded)
            }
            Step::Quit => Ok(StepOutcome::Quit),
        }
    }
}

// === Build directory ===

fn make_build_dir(
    session: &Session,
    target: Target,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    let dir = session.build_dir_for(target);
    term.say(&format!(
        "Creating out-of-source build directory: \"{}\".",
        dir.display()
    ));
    io::ensure_dir(dir, &format!("create {}", dir.display()))?;
    Ok(StepOutcome::Succeeded)
}

fn clean_build_dirs(session: &Session, term: &mut dyn Terminal) -> Result<StepOutcome> {
    term.say(&format!(
        "Deleting out-of-source build directory: \"{}\".",
        session.build_dir.display()
    ));
    io::remove_dir_if_exists(
        &session.build_dir,
        &format!("delete {}", session.build_dir.display()),
    )?;

    term.say(&format!(
        "Deleting out-of-source cross compilation build directory: \"{}\".",
        session.cross_build_dir.display()
    ));
    io::remove_dir_if_exists(
        &session.cross_build_dir,
        &format!("delete {}", session.cross_build_dir.display()),
    )?;

    Ok(StepOutcome::Succeeded)
}

// === External tools ===

/// Run an invocation with inherited stdio and report success as a bool.
fn run_tool(runner: &dyn ProcessRunner, invocation: &Invocation) -> Result<bool> {
    log_status!("cmake", "{}", invocation.display());
    let code = runner.status(invocation)?;
    Ok(code == 0)
}

pub(crate) fn configure_invocation(session: &Session) -> Invocation {
    let mut inv = Invocation::new("cmake")
        .args(["-D".to_string(), format!("CMAKE_BUILD_TYPE={}", session.configuration)]);

    if session.testing_enabled {
        inv = inv.args(["-D".to_string(), format!("{}=1", session.testing_define)]);
    }

    if let Some(name) = session.generator.name() {
        inv = inv.args(["-G", name]);
    }

    inv.arg(session.root.to_string_lossy())
        .in_dir(&session.build_dir)
}

fn configure(
    session: &mut Session,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    term.say("Configuring build project.");

    if !run_tool(runner, &configure_invocation(session))? {
        term.say("Configuration failed.");
        return Ok(StepOutcome::Failed);
    }
    term.say("Configuration succeeded.");

    session.refresh_generator();
    Ok(StepOutcome::Succeeded)
}

pub(crate) fn configure_cross_invocation(session: &Session) -> Result<Invocation> {
    let sdk = session.cross_toolchain.as_ref().ok_or_else(|| {
        Error::validation_invalid_argument(
            "toolchain",
            "No cross compilation toolchain was detected",
            None,
        )
    })?;

    let generator = session.generator_for(Target::Cross);
    let toolchain = paths::emscripten_toolchain(sdk);

    let mut inv = Invocation::new("cmake")
        .args(["-D".to_string(), format!("CMAKE_BUILD_TYPE={}", session.configuration)])
        .args([
            "-D".to_string(),
            format!("CMAKE_TOOLCHAIN_FILE={}", toolchain.display()),
        ]);

    if let Some(name) = generator.name() {
        inv = inv.args(["-G", name]);
    }

    Ok(inv
        .arg(session.root.to_string_lossy())
        .in_dir(&session.cross_build_dir))
}

fn configure_cross(
    session: &Session,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    let invocation = configure_cross_invocation(session)?;
    if let Some(sdk) = &session.cross_toolchain {
        term.say(&format!(
            "Configuring emscripten cross compilation build with path: {}",
            sdk.display()
        ));
    }

    if !run_tool(runner, &invocation)? {
        term.say("Configuration failed.");
        return Ok(StepOutcome::Failed);
    }
    term.say("Configuration succeeded.");
    Ok(StepOutcome::Succeeded)
}

pub(crate) fn build_invocation(session: &Session, target: Target, jobs: usize) -> Invocation {
    let dir = session.build_dir_for(target);
    let mut inv = Invocation::new("cmake")
        .arg("--build")
        .arg(dir.to_string_lossy())
        .args(["--config", session.configuration.as_str()]);

    if session.generator_for(target).is_makefiles() {
        inv = inv.args(["--".to_string(), format!("-j{}", jobs)]);
    }

    inv.in_dir(dir)
}

fn build(
    session: &Session,
    target: Target,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    term.say("Building project.");
    let success = run_tool(
        runner,
        &build_invocation(session, target, process::parallelism()),
    )?;
    term.say(if success {
        "Build succeeded."
    } else {
        "Build failed."
    });
    Ok(StepOutcome::from_success(success))
}

pub(crate) fn test_invocation(session: &Session, jobs: usize) -> Invocation {
    Invocation::new("ctest")
        .arg("--output-on-failure")
        .arg(format!("-j{}", jobs))
        .args(["--build-config", session.configuration.as_str()])
        .in_dir(&session.build_dir)
}

fn test(
    session: &Session,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    term.say("Running unit tests.");
    let success = run_tool(runner, &test_invocation(session, process::parallelism()))?;
    term.say(if success {
        "Testing succeeded."
    } else {
        "Testing failed."
    });
    Ok(StepOutcome::from_success(success))
}

fn pack_sources(
    session: &Session,
    format: &str,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    term.say("Packing sources.");
    let inv = Invocation::new("cpack")
        .args(["-G", format, "--config", "CPackSourceConfig.cmake"])
        .in_dir(&session.build_dir);

    let success = run_tool(runner, &inv)?;
    term.say(&format!(
        "Packing sources of type {} {}.",
        format,
        if success { "succeeded" } else { "failed" }
    ));
    Ok(StepOutcome::from_success(success))
}

fn pack_binaries(
    session: &Session,
    format: &str,
    target: Target,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<StepOutcome> {
    term.say("Packing binaries.");
    let inv = Invocation::new("cpack")
        .args(["-G", format, "-C", session.configuration.as_str()])
        .in_dir(session.build_dir_for(target));

    let success = run_tool(runner, &inv)?;
    term.say(&format!(
        "Packing binaries of type {} {}.",
        format,
        if success { "succeeded" } else { "failed" }
    ));
    Ok(StepOutcome::from_success(success))
}

// === Session selections ===

fn confirm_clean(term: &mut dyn Terminal) -> Result<bool> {
    Ok(term.ask("Do you want to clean build directory to apply the change? (y/n): ")? == "y")
}

fn enable_testing(session: &mut Session, term: &mut dyn Terminal) -> Result<StepOutcome> {
    let wanted = loop {
        match term.ask("Enable testing (y/n): ")?.as_str() {
            "y" => break true,
            "n" => break false,
            _ => continue,
        }
    };

    if session.testing_enabled == wanted {
        return Ok(StepOutcome::Succeeded);
    }

    session.testing_enabled = wanted;
    term.say("Testing state has changed.");
    if confirm_clean(term)? {
        return clean_build_dirs(session, term);
    }
    Ok(StepOutcome::Succeeded)
}

fn select_configuration(session: &mut Session, term: &mut dyn Terminal) -> Result<StepOutcome> {
    loop {
        term.say("Select build configuration:");
        for (index, config) in BuildConfiguration::ALL.iter().enumerate() {
            term.say(&format!("{}: {}", index + 1, config));
        }

        let answer = term.ask("Enter a value: ")?;
        let Some(config) = answer
            .parse::<usize>()
            .ok()
            .and_then(BuildConfiguration::from_menu_number)
        else {
            continue;
        };

        session.configuration = config;
        return Ok(StepOutcome::Succeeded);
    }
}

fn select_generator(session: &mut Session, term: &mut dyn Terminal) -> Result<StepOutcome> {
    let chosen = loop {
        term.say("Select generator:");
        for (index, generator) in session.generators.entries().iter().enumerate() {
            term.say(&format!("{}: {}", index, generator));
        }

        let answer = term.ask("Enter a value: ")?;
        if let Some(generator) = answer
            .parse::<usize>()
            .ok()
            .and_then(|index| session.generators.get(index))
        {
            break generator.clone();
        }
    };

    let current = session.cached_generator();
    if current == Generator::Default {
        session.generator = chosen;
        return Ok(StepOutcome::Succeeded);
    }

    if current != chosen {
        term.say(&format!(
            "Selected generator '{}' is different from the current one '{}'.",
            chosen, current
        ));
        if confirm_clean(term)? {
            session.generator = chosen;
            return clean_build_dirs(session, term);
        }
    }

    Ok(StepOutcome::Succeeded)
}
