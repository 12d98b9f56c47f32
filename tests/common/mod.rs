#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use buildhelper::process::{CommandOutput, Invocation, ProcessRunner};
use buildhelper::Error;

pub const CMAKE_HELP: &str = "Usage\n\n  cmake [options] <path-to-source>\n\n\
Generators\n\n\
The following generators are available on this platform:\n\
  Unix Makefiles               = Generates standard UNIX makefiles.\n\
  Ninja                        = Generates build.ninja files.\n";

/// Runner that records invocations and simulates installed tools.
pub struct FakeRunner {
    pub installed: Vec<&'static str>,
    pub failing: Vec<&'static str>,
    pub calls: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn with_tools(installed: &[&'static str]) -> Self {
        Self {
            installed: installed.to_vec(),
            failing: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(mut self, program: &'static str) -> Self {
        self.failing.push(program);
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }

    fn exit_code(&self, invocation: &Invocation) -> buildhelper::Result<i32> {
        self.calls.borrow_mut().push(invocation.clone());
        if !self.installed.contains(&invocation.program.as_str()) {
            return Err(Error::tool_not_found(&invocation.program, "No such file or directory"));
        }
        if self.failing.contains(&invocation.program.as_str()) {
            return Ok(2);
        }
        Ok(0)
    }
}

impl ProcessRunner for FakeRunner {
    fn status(&self, invocation: &Invocation) -> buildhelper::Result<i32> {
        self.exit_code(invocation)
    }

    fn output(&self, invocation: &Invocation) -> buildhelper::Result<CommandOutput> {
        let exit_code = self.exit_code(invocation)?;
        let stdout = if invocation.args.iter().any(|a| a == "--help") {
            CMAKE_HELP.to_string()
        } else {
            String::new()
        };
        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
            success: exit_code == 0,
            exit_code,
        })
    }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}
