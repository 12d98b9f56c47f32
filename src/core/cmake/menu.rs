//! Interactive menu: option table, sequence runner and the main loop.

use super::session::{Session, Target};
use super::step::{Step, StepOutcome};
use crate::error::{ErrorCode, Result};
use crate::process::ProcessRunner;
use crate::terminal::Terminal;

const SEPARATOR: &str = "------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Build,
    RunTests,
    Generate,
    Clean,
    PackBinaries,
    PackSources,
    EnableTesting,
    SelectConfiguration,
    SelectGenerator,
    Quit,
    BuildCross,
    PackCrossBinaries,
}

impl MenuCommand {
    const BASE: [MenuCommand; 10] = [
        MenuCommand::Build,
        MenuCommand::RunTests,
        MenuCommand::Generate,
        MenuCommand::Clean,
        MenuCommand::PackBinaries,
        MenuCommand::PackSources,
        MenuCommand::EnableTesting,
        MenuCommand::SelectConfiguration,
        MenuCommand::SelectGenerator,
        MenuCommand::Quit,
    ];

    const CROSS: [MenuCommand; 2] = [MenuCommand::BuildCross, MenuCommand::PackCrossBinaries];

    pub fn key(&self) -> &'static str {
        match self {
            MenuCommand::Build => "1",
            MenuCommand::BuildCross => "1a",
            MenuCommand::RunTests => "2",
            MenuCommand::Generate => "3",
            MenuCommand::Clean => "4",
            MenuCommand::PackBinaries => "5",
            MenuCommand::PackCrossBinaries => "5a",
            MenuCommand::PackSources => "6",
            MenuCommand::EnableTesting => "7",
            MenuCommand::SelectConfiguration => "8",
            MenuCommand::SelectGenerator => "9",
            MenuCommand::Quit => "q",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuCommand::Build => "Build",
            MenuCommand::BuildCross => "Build emscripten",
            MenuCommand::RunTests => "Run unit tests",
            MenuCommand::Generate => "Execute CMake generation step (don't build)",
            MenuCommand::Clean => "Clean out-of-source build directory",
            MenuCommand::PackBinaries => "Pack binaries",
            MenuCommand::PackCrossBinaries => "Pack emscripten binaries",
            MenuCommand::PackSources => "Pack sources",
            MenuCommand::EnableTesting => "Enable testing",
            MenuCommand::SelectConfiguration => "Select build configuration",
            MenuCommand::SelectGenerator => "Select cmake generator",
            MenuCommand::Quit => "Quit",
        }
    }

    /// Entries followed by a separator line in the listing.
    fn closes_group(&self) -> bool {
        matches!(
            self,
            MenuCommand::Clean
                | MenuCommand::PackSources
                | MenuCommand::SelectGenerator
                | MenuCommand::Quit
        )
    }

    /// Ordered steps run when the entry is selected.
    pub fn steps(&self, session: &Session) -> Vec<Step> {
        let build = || {
            vec![
                Step::MakeBuildDir(Target::Native),
                Step::Configure,
                Step::Build(Target::Native),
            ]
        };
        let build_cross = || {
            vec![
                Step::MakeBuildDir(Target::Cross),
                Step::ConfigureCross,
                Step::Build(Target::Cross),
            ]
        };

        match self {
            MenuCommand::Build => build(),
            MenuCommand::RunTests => {
                let mut steps = build();
                steps.push(Step::Test);
                steps
            }
            MenuCommand::Generate => vec![Step::MakeBuildDir(Target::Native), Step::Configure],
            MenuCommand::Clean => vec![Step::CleanBuildDir],
            MenuCommand::PackBinaries => {
                let mut steps = build();
                steps.extend(
                    session
                        .package_formats
                        .iter()
                        .map(|f| Step::PackBinaries(f.clone(), Target::Native)),
                );
                steps
            }
            MenuCommand::PackSources => {
                let mut steps = vec![Step::MakeBuildDir(Target::Native), Step::Configure];
                steps.extend(
                    session
                        .package_formats
                        .iter()
                        .map(|f| Step::PackSources(f.clone())),
                );
                steps
            }
            MenuCommand::EnableTesting => vec![Step::EnableTesting],
            MenuCommand::SelectConfiguration => vec![Step::SelectConfiguration],
            MenuCommand::SelectGenerator => vec![Step::SelectGenerator],
            MenuCommand::Quit => vec![Step::Quit],
            MenuCommand::BuildCross => build_cross(),
            MenuCommand::PackCrossBinaries => {
                let mut steps = build();
                steps.extend(build_cross());
                steps.push(Step::PackBinaries(
                    session.cross_package_format.clone(),
                    Target::Cross,
                ));
                steps
            }
        }
    }
}

/// Option table sorted by key. The cross entries appear only when a cross
/// toolchain was detected.
pub fn menu_table(cross_available: bool) -> Vec<MenuCommand> {
    let mut table: Vec<MenuCommand> = MenuCommand::BASE.to_vec();
    if cross_available {
        table.extend(MenuCommand::CROSS);
    }
    table.sort_by_key(|c| c.key());
    table
}

pub fn find_command(table: &[MenuCommand], input: &str) -> Option<MenuCommand> {
    table.iter().copied().find(|c| c.key() == input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Failed,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceReport {
    /// Steps started, including the one that failed or quit.
    pub executed: usize,
    pub outcome: SequenceOutcome,
}

/// Execute steps in order, stopping at the first failure.
pub fn run_sequence(
    steps: &[Step],
    session: &mut Session,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<SequenceReport> {
    let mut executed = 0;

    for step in steps {
        executed += 1;
        match step.execute(session, runner, term)? {
            StepOutcome::Succeeded => term.say("\nExecution success.\n"),
            StepOutcome::Failed => {
                term.say("\nExecution failed.\n");
                return Ok(SequenceReport {
                    executed,
                    outcome: SequenceOutcome::Failed,
                });
            }
            StepOutcome::Quit => {
                return Ok(SequenceReport {
                    executed,
                    outcome: SequenceOutcome::Quit,
                })
            }
        }
    }

    Ok(SequenceReport {
        executed,
        outcome: SequenceOutcome::Completed,
    })
}

fn print_menu(session: &Session, table: &[MenuCommand], term: &mut dyn Terminal) {
    term.say(&format!("{} CMake build helper tool", session.title));
    term.say("");
    term.say(&format!(
        "Selected build configuration: {}",
        session.configuration
    ));
    term.say(&format!("Selected generator: {}", session.generator));
    term.say(&format!("Testing enabled: {}", session.testing_enabled));
    term.say("");
    term.say("Choose an option:");
    term.say(SEPARATOR);
    for command in table {
        term.say(&format!("  {}: {}", command.key(), command.label()));
        match command {
            MenuCommand::Quit => term.say(SEPARATOR),
            c if c.closes_group() => term.say(&format!("  {}", SEPARATOR)),
            _ => {}
        }
    }
}

/// Run the menu until Quit is selected or the input closes.
///
/// Errors raised while a sequence runs are printed and the loop continues;
/// only a closed input ends the loop early.
pub fn run_menu(
    session: &mut Session,
    runner: &dyn ProcessRunner,
    term: &mut dyn Terminal,
) -> Result<()> {
    let table = menu_table(session.has_cross_toolchain());

    loop {
        Step::ClearScreen.execute(session, runner, term)?;
        print_menu(session, &table, term);

        let answer = match term.ask("Enter a value: ") {
            Ok(answer) => answer,
            Err(err) if err.code == ErrorCode::InputClosed => return Ok(()),
            Err(err) => return Err(err),
        };
        let Some(command) = find_command(&table, &answer) else {
            continue;
        };

        Step::ClearScreen.execute(session, runner, term)?;
        let steps = command.steps(session);
        match run_sequence(&steps, session, runner, term) {
            Ok(report) if report.outcome == SequenceOutcome::Quit => return Ok(()),
            Ok(_) => {}
            Err(err) if err.code == ErrorCode::InputClosed => return Ok(()),
            Err(err) => {
                log_status!("menu", "{} failed: {}", command.label(), err.code.as_str());
                term.say(&format!(
                    "\nAn error occurred during script execution: {}\n",
                    err.describe()
                ));
            }
        }

        match term.ask("Press enter to continue...") {
            Ok(_) => {}
            Err(err) if err.code == ErrorCode::InputClosed => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}
