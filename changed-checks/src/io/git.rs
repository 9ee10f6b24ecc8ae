//! Git adapter for change discovery.
//!
//! Only two queries are needed, so we keep a small, explicit wrapper around
//! `git` subprocess calls instead of linking a git library.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, instrument, warn};

use crate::error::CheckError;

/// Version-control queries used to build the change set.
pub trait VcsQuery {
    /// Paths that differ from `base` (committed, staged or unstaged), excluding deletions.
    fn modified_since(&self, base: &str) -> Result<Vec<String>, CheckError>;

    /// Untracked paths not excluded by ignore rules.
    fn untracked(&self) -> Result<Vec<String>, CheckError>;
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Absolute top level of the repository containing `workdir`.
    ///
    /// Change listings are relative to this directory, so it is the root every
    /// other step must use.
    #[instrument(skip(self))]
    pub fn toplevel(&self) -> Result<PathBuf, CheckError> {
        let output = self.run_checked(&["rev-parse", "--show-toplevel"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let top = stdout.trim_end_matches(['\n', '\r']);
        debug!(toplevel = top, "repository root");
        Ok(PathBuf::from(top))
    }

    fn run_paths(&self, args: &[&str]) -> Result<Vec<String>, CheckError> {
        let output = self.run_checked(args)?;
        Ok(parse_name_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output, CheckError> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(code = ?output.status.code(), "git query failed");
            return Err(CheckError::VcsQuery {
                command: args.join(" "),
                detail: stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output, CheckError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|err| CheckError::VcsQuery {
                command: args.join(" "),
                detail: format!("spawn git: {err}"),
            })
    }
}

impl VcsQuery for Git {
    #[instrument(skip(self))]
    fn modified_since(&self, base: &str) -> Result<Vec<String>, CheckError> {
        let paths = self.run_paths(&["diff", "--name-only", "-z", "--diff-filter=d", base, "--"])?;
        debug!(count = paths.len(), "modified paths");
        Ok(paths)
    }

    #[instrument(skip(self))]
    fn untracked(&self) -> Result<Vec<String>, CheckError> {
        let paths = self.run_paths(&["ls-files", "-z", "--others", "--exclude-standard"])?;
        debug!(count = paths.len(), "untracked paths");
        Ok(paths)
    }
}

/// Split `-z` output. Paths are verbatim: no quoting, no trimming.
fn parse_name_list(out: &str) -> Vec<String> {
    out.split('\0')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the repository top level for a directory inside a work tree.
pub fn repo_root(dir: &Path) -> Result<PathBuf, CheckError> {
    Git::new(dir).toplevel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestTree;

    #[test]
    fn parses_nul_separated_names_verbatim() {
        let paths = parse_name_list("src/a.py\0 spaced .py\0tests/unit/a_test.py\0");
        assert_eq!(paths, vec!["src/a.py", " spaced .py", "tests/unit/a_test.py"]);
    }

    #[test]
    fn non_ascii_paths_are_not_quoted() {
        let tree = TestTree::git_repo().expect("repo");
        tree.write("src/base.py", "").expect("write");
        tree.write("src/naïve.py", "").expect("write");
        tree.commit_all("init").expect("commit");

        tree.write("src/naïve.py", "x = 1\n").expect("modify");
        tree.write("src/café.py", "").expect("untracked");

        let git = Git::new(tree.path());
        assert_eq!(git.modified_since("HEAD").expect("diff"), vec!["src/naïve.py"]);
        assert_eq!(git.untracked().expect("untracked"), vec!["src/café.py"]);
    }

    #[test]
    fn subdirectory_resolves_to_toplevel_and_lists_whole_repo() {
        let tree = TestTree::git_repo().expect("repo");
        tree.write("pkg/src/foo.py", "x = 1\n").expect("write");
        tree.commit_all("init").expect("commit");
        tree.write("pkg/src/foo.py", "x = 2\n").expect("modify");
        tree.write("top.py", "").expect("untracked");

        let root = repo_root(&tree.path().join("pkg")).expect("root");
        assert_eq!(
            root.canonicalize().expect("canonical root"),
            tree.path().canonicalize().expect("canonical tree")
        );
        let git = Git::new(&root);
        assert_eq!(git.modified_since("HEAD").expect("diff"), vec!["pkg/src/foo.py"]);
        assert_eq!(git.untracked().expect("untracked"), vec!["top.py"]);
    }

    #[test]
    fn lists_modified_and_untracked_files() {
        let tree = TestTree::git_repo().expect("repo");
        tree.write("src/tracked.py", "x = 1\n").expect("write");
        tree.write("src/deleted.py", "y = 1\n").expect("write");
        tree.commit_all("init").expect("commit");

        tree.write("src/tracked.py", "x = 2\n").expect("modify");
        tree.remove("src/deleted.py").expect("delete");
        tree.write("src/new.py", "z = 1\n").expect("untracked");
        tree.write(".gitignore", "build/\n").expect("gitignore");
        tree.write("build/out.py", "").expect("ignored");

        let git = Git::new(tree.path());
        assert_eq!(
            git.modified_since("HEAD").expect("diff"),
            vec!["src/tracked.py"]
        );
        assert_eq!(
            git.untracked().expect("untracked"),
            vec![".gitignore", "src/new.py"]
        );
    }

    #[test]
    fn unknown_base_is_vcs_failure() {
        let tree = TestTree::git_repo().expect("repo");
        tree.write("a.py", "").expect("write");
        tree.commit_all("init").expect("commit");

        let err = Git::new(tree.path())
            .modified_since("no-such-ref")
            .expect_err("bad ref");
        assert!(matches!(err, CheckError::VcsQuery { .. }));
    }

    #[test]
    fn outside_repository_is_vcs_failure() {
        let tree = TestTree::new().expect("tree");
        let err = Git::new(tree.path()).untracked().expect_err("not a repo");
        assert!(matches!(err, CheckError::VcsQuery { .. }));
    }
}
