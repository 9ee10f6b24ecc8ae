//! Test-only helpers: scratch trees, a scripted VCS and a recording tool runner.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::core::plan::Invocation;
use crate::core::types::Step;
use crate::error::CheckError;
use crate::io::git::VcsQuery;
use crate::io::process::ToolRunner;

/// Scratch directory standing in for a repository working tree.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("tempdir")?,
        })
    }

    /// Scratch tree with `git init` and a local identity configured.
    pub fn git_repo() -> Result<Self> {
        let tree = Self::new()?;
        tree.git(&["init", "-q"])?;
        tree.git(&["config", "user.email", "checks@example.com"])?;
        tree.git(&["config", "user.name", "checks"])?;
        tree.git(&["config", "commit.gpgsign", "false"])?;
        Ok(tree)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to a repo-relative path, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    pub fn remove(&self, rel: &str) -> Result<()> {
        let path = self.path().join(rel);
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))
    }

    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-q", "-m", message])
    }

    pub fn git(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// In-memory VCS returning fixed listings.
#[derive(Debug, Clone, Default)]
pub struct FakeVcs {
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    /// When set, every query fails with this detail.
    pub failure: Option<String>,
}

impl FakeVcs {
    pub fn with_changes(modified: &[&str], untracked: &[&str]) -> Self {
        Self {
            modified: modified.iter().map(|p| p.to_string()).collect(),
            untracked: untracked.iter().map(|p| p.to_string()).collect(),
            failure: None,
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_string()),
            ..Self::default()
        }
    }

    fn check(&self, command: &str) -> Result<(), CheckError> {
        match &self.failure {
            Some(detail) => Err(CheckError::VcsQuery {
                command: command.to_string(),
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl VcsQuery for FakeVcs {
    fn modified_since(&self, base: &str) -> Result<Vec<String>, CheckError> {
        self.check(&format!("diff {base}"))?;
        Ok(self.modified.clone())
    }

    fn untracked(&self) -> Result<Vec<String>, CheckError> {
        self.check("ls-files")?;
        Ok(self.untracked.clone())
    }
}

/// Tool runner that records invocations and returns scripted exit codes.
///
/// Steps without a scripted code succeed.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Invocation>>,
    exit_codes: BTreeMap<Step, i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(step: Step, code: i32) -> Self {
        let mut runner = Self::default();
        runner.exit_codes.insert(step, code);
        runner
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.borrow().iter().map(|inv| inv.step).collect()
    }

    pub fn call(&self, step: Step) -> Option<Invocation> {
        self.calls
            .borrow()
            .iter()
            .find(|inv| inv.step == step)
            .cloned()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32, CheckError> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(self.exit_codes.get(&invocation.step).copied().unwrap_or(0))
    }
}
