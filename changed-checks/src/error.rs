//! Failure classes the CLI maps to exit statuses.

use crate::core::types::Step;
use crate::exit_codes;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The version-control query could not produce a file list.
    #[error("git {command} failed: {detail}")]
    VcsQuery { command: String, detail: String },

    /// A dispatched tool exited non-zero.
    #[error("{step} failed with exit status {code}")]
    ToolFailure { step: Step, code: i32 },

    /// A dispatched tool could not be started at all.
    #[error("{step}: could not run {program}")]
    ToolSpawn {
        step: Step,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl CheckError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckError::ToolFailure { code, .. } => *code,
            CheckError::ToolSpawn { .. } => exit_codes::SPAWN_FAILED,
            CheckError::VcsQuery { .. } | CheckError::Config(_) => exit_codes::ERROR,
        }
    }
}

/// Exit status for an error chain: the first `CheckError` found wins.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CheckError>())
        .map(CheckError::exit_code)
        .unwrap_or(exit_codes::ERROR)
}
