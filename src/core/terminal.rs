//! Console interaction for the interactive menu.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{Error, Result};

/// Line-oriented console used by the menu and its sub-prompts.
pub trait Terminal {
    /// Print one line.
    fn say(&mut self, line: &str);

    /// Print `message` without a newline and read one trimmed line of input.
    /// Returns `input.closed` once the input is exhausted.
    fn ask(&mut self, message: &str) -> Result<String>;

    /// Clear the screen.
    fn clear(&mut self);
}

/// Terminal over the process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdTerminal;

impl Terminal for StdTerminal {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, message: &str) -> Result<String> {
        print!("{}", message);
        io::stdout().flush().ok();

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(|e| {
            Error::internal_io(
                format!("Failed to read input: {}", e),
                Some("read stdin".to_string()),
            )
        })?;

        if read == 0 {
            return Err(Error::input_closed());
        }

        Ok(line.trim().to_string())
    }

    fn clear(&mut self) {
        if io::stdout().is_terminal() {
            print!("\x1B[2J\x1B[1;1H");
            io::stdout().flush().ok();
        }
    }
}

/// Terminal fed from a fixed list of answers, recording everything printed.
/// Drives the menu without a console (tests, piped runs).
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
    pub clears: usize,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            clears: 0,
        }
    }

    /// True when any printed line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, message: &str) -> Result<String> {
        self.transcript.push(message.to_string());
        self.answers.pop_front().ok_or_else(Error::input_closed)
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
