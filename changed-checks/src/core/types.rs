//! Shared deterministic types for classification and dispatch.
//!
//! These types define stable contracts between core components. They carry no
//! I/O and must serialize the same way across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification tag for a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Anything outside the test tree.
    Source,
    /// Under the profile's unit-test prefix.
    UnitTest,
    /// Under the profile's functional-test prefix.
    FunctionalTest,
    /// Under the test tree but neither unit nor functional.
    OtherTest,
}

/// One dispatch step, declared in execution order.
///
/// The derived `Ord` follows declaration order, so sorting steps yields the
/// order in which they run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Format,
    SortImports,
    LintSource,
    LintTests,
    Docstyle,
    Codestyle,
    UnitTests,
    CoverageCombine,
    CoverageReport,
    CoverageHtml,
    FunctionalTests,
}

impl Step {
    /// Every step in execution order.
    pub const ALL: [Step; 11] = [
        Step::Format,
        Step::SortImports,
        Step::LintSource,
        Step::LintTests,
        Step::Docstyle,
        Step::Codestyle,
        Step::UnitTests,
        Step::CoverageCombine,
        Step::CoverageReport,
        Step::CoverageHtml,
        Step::FunctionalTests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::Format => "format",
            Step::SortImports => "sort-imports",
            Step::LintSource => "lint-source",
            Step::LintTests => "lint-tests",
            Step::Docstyle => "docstyle",
            Step::Codestyle => "codestyle",
            Step::UnitTests => "unit-tests",
            Step::CoverageCombine => "coverage-combine",
            Step::CoverageReport => "coverage-report",
            Step::CoverageHtml => "coverage-html",
            Step::FunctionalTests => "functional-tests",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the selected files are handed to a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileArgs {
    /// Append each file as a positional argument.
    #[default]
    Trailing,
    /// Pass files as one comma-joined `--include=` option.
    Include,
    /// The step is gated on its subset but takes no file arguments.
    Omit,
}

/// Binding of a step to an external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub files: FileArgs,
    /// tox environment used when running through the isolated wrapper.
    /// Empty in a config override means "keep the profile's environment".
    #[serde(default)]
    pub tox_env: String,
}

impl ToolSpec {
    pub fn new(program: &str, args: &[&str], tox_env: &str) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            files: FileArgs::Trailing,
            tox_env: tox_env.to_string(),
        }
    }

    pub fn with_files(mut self, files: FileArgs) -> Self {
        self.files = files;
        self
    }
}
