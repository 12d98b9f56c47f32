//! External process capability.
//!
//! Every call out to cmake, ctest, cpack or the cross toolchain goes through
//! [`ProcessRunner`], so the orchestration logic can be exercised in tests
//! without spawning anything.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// A single program invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Printable command line. Arguments with whitespace are single-quoted.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{}'", part.replace('\'', "'\\''"))
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output from a finished process.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

/// Synchronous spawn-and-wait capability.
///
/// `Err` is reserved for processes that could not be started at all; a
/// process that ran and exited non-zero is reported through its exit code.
pub trait ProcessRunner {
    /// Run with inherited stdio and wait. Returns the exit code (-1 when the
    /// process was killed by a signal).
    fn status(&self, invocation: &Invocation) -> Result<i32>;

    /// Run with captured stdout/stderr and wait.
    fn output(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn status(&self, invocation: &Invocation) -> Result<i32> {
        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::tool_not_found(&invocation.program, e.to_string()))?;

        Ok(status.code().unwrap_or(-1))
    }

    fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let out = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::tool_not_found(&invocation.program, e.to_string()))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
        })
    }
}

/// Check that a program can be started. Its exit code is irrelevant: running
/// `cmake` without arguments exits non-zero but proves the tool is installed.
pub fn probe(runner: &dyn ProcessRunner, program: &str) -> Result<()> {
    runner.output(&Invocation::new(program)).map(|_| ())
}

/// Worker count hint handed to parallel builds and test runs.
pub fn parallelism() -> usize {
    num_cpus::get().max(1)
}
