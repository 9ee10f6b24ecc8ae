//! Turn a classified change set into the ordered list of tool invocations.

use crate::core::change_set::Classified;
use crate::core::profile::Profile;
use crate::core::types::{FileArgs, Step};

const TOX_PROGRAM: &str = "tox";

/// A fully expanded external command for one dispatch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: Step,
    pub program: String,
    pub args: Vec<String>,
    pub tox_env: String,
}

impl Invocation {
    /// Shell-style rendering used for verbose echo, dry runs and the tox wrapper.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Same command, run inside the step's tox environment.
    pub fn isolated(&self) -> Invocation {
        Invocation {
            step: self.step,
            program: TOX_PROGRAM.to_string(),
            args: vec![
                "-qe".to_string(),
                self.tox_env.clone(),
                "--run-command".to_string(),
                self.command_line(),
            ],
            tox_env: self.tox_env.clone(),
        }
    }
}

/// Files a step operates on. Empty means the step is skipped.
pub fn step_input(step: Step, classified: &Classified) -> Vec<String> {
    match step {
        Step::Format | Step::SortImports | Step::Docstyle | Step::Codestyle => {
            classified.python.clone()
        }
        Step::LintSource => classified.sources.clone(),
        Step::LintTests => classified.tests(),
        Step::UnitTests => classified.unit_tests.clone(),
        // No unit-test run means no coverage data to combine or report on.
        Step::CoverageCombine | Step::CoverageReport | Step::CoverageHtml => {
            if classified.unit_tests.is_empty() {
                Vec::new()
            } else {
                classified.python.clone()
            }
        }
        Step::FunctionalTests => classified.functional_tests.clone(),
    }
}

/// Build invocations in dispatch order, omitting steps with no input.
pub fn plan_steps(classified: &Classified, profile: &Profile) -> Vec<Invocation> {
    let mut plan = Vec::new();
    for step in Step::ALL {
        let files = step_input(step, classified);
        if files.is_empty() {
            continue;
        }
        let spec = profile.tools.get(step);
        let mut args = spec.args.clone();
        match spec.files {
            FileArgs::Trailing => args.extend(files),
            FileArgs::Include => args.push(format!("--include={}", files.join(","))),
            FileArgs::Omit => {}
        }
        plan.push(Invocation {
            step,
            program: spec.program.clone(),
            args,
            tox_env: spec.tox_env.clone(),
        });
    }
    plan
}

fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+%".contains(c));
    if plain {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
