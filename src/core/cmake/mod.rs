//! Interactive CMake build helper.
//!
//! A [`Session`] holds the selected configuration and generator, the
//! [`menu`] maps each option to an ordered list of [`Step`]s, and every
//! external tool call goes through a [`ProcessRunner`](crate::process::ProcessRunner).

pub mod configuration;
pub mod generator;
pub mod menu;
pub mod session;
pub mod step;

pub use configuration::BuildConfiguration;
pub use generator::{Generator, GeneratorCatalog};
pub use menu::{menu_table, run_menu, run_sequence, MenuCommand, SequenceOutcome, SequenceReport};
pub use session::{Session, Target};
pub use step::{Step, StepOutcome};

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::path::Path;

    use super::Session;
    use crate::defaults::BuildConfig;
    use crate::error::{Error, Result};
    use crate::process::{CommandOutput, Invocation, ProcessRunner};

    pub fn session_in(root: &Path) -> Session {
        Session::new(root, &BuildConfig::default())
    }

    /// Records invocations; exits non-zero for `failing` programs and fails
    /// to spawn `missing` ones.
    #[derive(Default)]
    pub struct RecordingRunner {
        calls: RefCell<Vec<Invocation>>,
        failing: Vec<String>,
        missing: Vec<String>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(program: &str) -> Self {
            Self {
                failing: vec![program.to_string()],
                ..Self::default()
            }
        }

        pub fn missing(mut self, program: &str) -> Self {
            self.missing.push(program.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }

        fn record(&self, invocation: &Invocation) -> Result<i32> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.missing.contains(&invocation.program) {
                return Err(Error::tool_not_found(&invocation.program, "not installed"));
            }
            Ok(if self.failing.contains(&invocation.program) {
                1
            } else {
                0
            })
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn status(&self, invocation: &Invocation) -> Result<i32> {
            self.record(invocation)
        }

        fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
            let exit_code = self.record(invocation)?;
            Ok(CommandOutput {
                success: exit_code == 0,
                exit_code,
                ..CommandOutput::default()
            })
        }
    }
}
