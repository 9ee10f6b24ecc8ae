//! Running dispatched tools as child processes.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, error, instrument};

use crate::core::plan::Invocation;
use crate::error::CheckError;
use crate::exit_codes;

/// Executes one planned invocation and reports its exit status.
pub trait ToolRunner {
    /// Returns the tool's exit code (0 on success).
    fn run(&self, invocation: &Invocation) -> Result<i32, CheckError>;
}

/// Runs tools in `workdir` with inherited stdio, blocking until each exits.
#[derive(Debug, Clone)]
pub struct SystemToolRunner {
    pub workdir: PathBuf,
    /// Echo each command line to stderr before running it.
    pub verbose: bool,
}

impl SystemToolRunner {
    pub fn new(workdir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            workdir: workdir.into(),
            verbose,
        }
    }
}

impl ToolRunner for SystemToolRunner {
    #[instrument(skip_all, fields(step = %invocation.step, program = %invocation.program))]
    fn run(&self, invocation: &Invocation) -> Result<i32, CheckError> {
        if self.verbose {
            eprintln!("+ {}", invocation.command_line());
        }
        debug!(args = invocation.args.len(), "spawning tool");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&self.workdir)
            .status()
            .map_err(|source| {
                error!(err = %source, "failed to spawn tool");
                CheckError::ToolSpawn {
                    step: invocation.step,
                    program: invocation.program.clone(),
                    source,
                }
            })?;
        // Terminated by a signal: no code to pass through.
        let code = status.code().unwrap_or(exit_codes::ERROR);
        debug!(code, "tool finished");
        Ok(code)
    }
}
