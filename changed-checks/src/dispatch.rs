//! Orchestration for a single `changed-checks` run.
//!
//! Discovery → augmentation → classification → plan → sequential execution.
//! The first failing tool stops the run.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::change_set::{ChangeSet, Classified};
use crate::core::plan::{Invocation, plan_steps};
use crate::core::profile::{Profile, profile_by_name, select_profile};
use crate::core::types::Step;
use crate::error::CheckError;
use crate::io::config::ChecksConfig;
use crate::io::git::VcsQuery;
use crate::io::process::ToolRunner;

/// Options for one run, after merging config and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Reference the modified-file query diffs against.
    pub base_ref: String,
    /// Run every tool through its tox environment.
    pub use_isolated_environment: bool,
}

/// Everything decided before any tool runs.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub change_set: ChangeSet,
    pub classified: Classified,
    pub plan: Vec<Invocation>,
}

/// Steps executed and steps skipped for lack of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub ran: Vec<Step>,
    pub skipped: Vec<Step>,
}

/// Pick the profile for `root`: forced by config, else detected by marker directory.
///
/// Config tool overrides are applied on top of the chosen profile.
pub fn resolve_profile(root: &Path, config: &ChecksConfig) -> Result<Profile> {
    let profile = match &config.profile {
        Some(name) => profile_by_name(name)
            .ok_or_else(|| CheckError::Config(format!("unknown profile '{name}'")))?,
        None => select_profile(|dir| root.join(dir).is_dir()),
    };
    debug!(profile = profile.name, "profile selected");
    Ok(profile.with_tool_overrides(&config.tools))
}

/// Union of modified-since-base and untracked paths.
pub fn discover<V: VcsQuery>(vcs: &V, base_ref: &str) -> Result<ChangeSet> {
    let modified = vcs
        .modified_since(base_ref)
        .with_context(|| format!("list files changed since {base_ref}"))?;
    let untracked = vcs.untracked().context("list untracked files")?;
    Ok(ChangeSet::from_discovery(modified, untracked))
}

/// Discover, augment, classify and plan without running anything.
#[instrument(skip_all, fields(base_ref = %options.base_ref, profile = profile.name))]
pub fn prepare<V: VcsQuery>(
    root: &Path,
    vcs: &V,
    profile: &Profile,
    options: &DispatchOptions,
) -> Result<Prepared> {
    let discovered = discover(vcs, &options.base_ref)?;
    let change_set = discovered.augment(profile, |path| root.join(path).is_file());
    debug!(
        discovered = discovered.len(),
        augmented = change_set.len(),
        "change set built"
    );
    let classified = change_set.classify(profile);
    let mut plan = plan_steps(&classified, profile);
    if options.use_isolated_environment {
        plan = plan.iter().map(Invocation::isolated).collect();
    }
    Ok(Prepared {
        change_set,
        classified,
        plan,
    })
}

/// Run each planned invocation in order, stopping at the first non-zero exit.
pub fn execute<R: ToolRunner>(plan: &[Invocation], runner: &R) -> Result<Vec<Step>> {
    let mut ran = Vec::with_capacity(plan.len());
    for invocation in plan {
        let code = runner.run(invocation)?;
        ran.push(invocation.step);
        if code != 0 {
            info!(step = %invocation.step, code, "step failed, stopping");
            return Err(CheckError::ToolFailure {
                step: invocation.step,
                code,
            }
            .into());
        }
    }
    Ok(ran)
}

/// Full run: prepare the plan, then execute it.
pub fn run_checks<V: VcsQuery, R: ToolRunner>(
    root: &Path,
    vcs: &V,
    runner: &R,
    profile: &Profile,
    options: &DispatchOptions,
) -> Result<DispatchOutcome> {
    let prepared = prepare(root, vcs, profile, options)?;
    if prepared.plan.is_empty() {
        info!("no applicable files, nothing to run");
    }
    let ran = execute(&prepared.plan, runner)?;
    let skipped = Step::ALL
        .into_iter()
        .filter(|step| !ran.contains(step))
        .collect();
    Ok(DispatchOutcome { ran, skipped })
}
