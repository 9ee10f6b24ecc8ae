//! Optional `checks.toml` at the repository root.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::profile::profile_by_name;
use crate::core::types::{Step, ToolSpec};
use crate::error::CheckError;

pub const CONFIG_FILE: &str = "checks.toml";
pub const DEFAULT_BASE_REF: &str = "origin/main";

/// Checks configuration (TOML).
///
/// Missing fields default to the built-in profile behavior. Command-line flags
/// take precedence over anything set here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    /// Reference the modified-file query diffs against.
    pub base_ref: String,

    /// Force a profile by name instead of detecting it from marker directories.
    pub profile: Option<String>,

    /// Per-step replacement tool bindings.
    pub tools: BTreeMap<Step, ToolSpec>,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            base_ref: DEFAULT_BASE_REF.to_string(),
            profile: None,
            tools: BTreeMap::new(),
        }
    }
}

impl ChecksConfig {
    pub fn validate(&self) -> Result<(), CheckError> {
        if self.base_ref.trim().is_empty() {
            return Err(CheckError::Config("base_ref must be non-empty".to_string()));
        }
        if let Some(name) = &self.profile
            && profile_by_name(name).is_none()
        {
            return Err(CheckError::Config(format!("unknown profile '{name}'")));
        }
        for (step, spec) in &self.tools {
            if spec.program.trim().is_empty() {
                return Err(CheckError::Config(format!(
                    "tools.{}.program must be non-empty",
                    toml_key(*step)
                )));
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ChecksConfig::default()`.
pub fn load_config(path: &Path) -> Result<ChecksConfig> {
    if !path.exists() {
        return Ok(ChecksConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ChecksConfig = toml::from_str(&contents)
        .map_err(|err| CheckError::Config(err.to_string()))
        .with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

fn toml_key(step: Step) -> String {
    step.name().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FileArgs;
    use crate::error::exit_code_for;
    use crate::exit_codes;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ChecksConfig::default());
    }

    #[test]
    fn load_reads_overrides() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
base_ref = "origin/develop"
profile = "h"

[tools.lint_source]
program = "ruff"
args = ["check"]

[tools.coverage_report]
program = "coverage"
args = ["report", "-m"]
files = "include"
tox_env = "cov"
"#,
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.base_ref, "origin/develop");
        assert_eq!(cfg.profile.as_deref(), Some("h"));
        let lint = &cfg.tools[&Step::LintSource];
        assert_eq!(lint.program, "ruff");
        assert_eq!(lint.files, FileArgs::Trailing);
        assert!(lint.tox_env.is_empty());
        assert_eq!(cfg.tools[&Step::CoverageReport].files, FileArgs::Include);
    }

    #[test]
    fn unknown_profile_is_config_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "profile = \"mystery\"\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("unknown profile 'mystery'"));
        assert_eq!(exit_code_for(&err), exit_codes::ERROR);
    }

    #[test]
    fn empty_program_is_rejected() {
        let mut cfg = ChecksConfig::default();
        cfg.tools
            .insert(Step::UnitTests, ToolSpec::new(" ", &[], "tests"));
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("tools.unit_tests.program"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "base = \"main\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
