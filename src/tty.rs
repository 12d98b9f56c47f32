//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection and status messages.

use std::io::{self, IsTerminal};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn is_stdout_tty() -> bool {
    io::stdout().is_terminal()
}

pub fn require_tty_for_interactive() -> bool {
    is_stdin_tty() && is_stdout_tty()
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
