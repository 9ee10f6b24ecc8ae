//! Run checks on the files changed on the current branch.
//!
//! Collects modified and untracked files from git, pulls in each file's test
//! (or source) counterpart, and runs formatters, linters and tests over the
//! relevant subsets in a fixed order. The first failing tool's exit status
//! becomes ours.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use changed_checks::dispatch::{DispatchOptions, prepare, resolve_profile, run_checks};
use changed_checks::error::exit_code_for;
use changed_checks::exit_codes;
use changed_checks::io::config::{CONFIG_FILE, load_config};
use changed_checks::io::git::{Git, repo_root};
use changed_checks::io::process::SystemToolRunner;
use changed_checks::logging;

#[derive(Parser)]
#[command(
    name = "changed-checks",
    version,
    about = "Format, lint and test only the files changed on this branch"
)]
struct Cli {
    /// Run each tool inside its tox environment.
    #[arg(short, long)]
    tox: bool,
    /// Echo each command line before running it.
    #[arg(short, long)]
    verbose: bool,
    /// Base reference to diff against (overrides `checks.toml`).
    #[arg(long)]
    base: Option<String>,
    /// Print the planned commands without running them.
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Directory inside the repository (defaults to the current directory).
    #[arg(short = 'C', long = "dir")]
    dir: Option<PathBuf>,
}

fn main() {
    logging::init();
    let code = match run(Cli::parse()) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let start = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    // git lists paths relative to the top level, so everything runs from there.
    let root = repo_root(&start)
        .with_context(|| format!("locate repository containing {}", start.display()))?;
    let config = load_config(&root.join(CONFIG_FILE))?;
    let profile = resolve_profile(&root, &config)?;
    let options = DispatchOptions {
        base_ref: cli.base.unwrap_or(config.base_ref),
        use_isolated_environment: cli.tox,
    };
    let git = Git::new(&root);

    if cli.dry_run {
        let prepared = prepare(&root, &git, &profile, &options)?;
        for invocation in &prepared.plan {
            println!("{}", invocation.command_line());
        }
        return Ok(());
    }

    let runner = SystemToolRunner::new(&root, cli.verbose);
    run_checks(&root, &git, &runner, &profile, &options)?;
    Ok(())
}
