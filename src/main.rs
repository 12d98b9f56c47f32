use clap::{Parser, Subcommand};

use buildhelper::output;
use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    InteractivePassthrough,
}

mod commands;
mod tty;

use commands::license;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "buildhelper")]
#[command(version = VERSION)]
#[command(about = "Interactive CMake build helper and license header normalizer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive build menu (default when no command is given)
    Menu,
    /// Normalize license banners and include guards
    License(license::LicenseArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Menu => ResponseMode::InteractivePassthrough,
        Commands::License(_) => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Menu);

    let global = GlobalArgs {};
    let mode = response_mode(&command);

    if let ResponseMode::InteractivePassthrough = mode {
        if !tty::require_tty_for_interactive() {
            let err = buildhelper::Error::validation_invalid_argument(
                "tty",
                "This command requires an interactive TTY",
                None,
            );
            let _ = output::print_result(Err(err));
            return std::process::ExitCode::from(exit_code_to_u8(2));
        }
    }

    let (json_result, exit_code) = commands::run_json(command, &global);

    match mode {
        ResponseMode::Json => {
            let _ = output::print_result(json_result);
        }
        ResponseMode::InteractivePassthrough => {
            if let Err(err) = json_result {
                eprintln!("{}", err.describe());
            }
        }
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
