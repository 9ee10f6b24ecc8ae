//! Project profiles: classification prefixes plus tool bindings.
//!
//! A profile is plain data. Selection walks [`PROFILE_RULES`] once at startup
//! and the chosen value is threaded through the rest of the run.

use std::collections::BTreeMap;

use crate::core::types::{FileArgs, Step, ToolSpec};

pub const DEFAULT_PROFILE: &str = "default";

/// Tool binding for every dispatch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub format: ToolSpec,
    pub sort_imports: ToolSpec,
    pub lint_source: ToolSpec,
    pub lint_tests: ToolSpec,
    pub docstyle: ToolSpec,
    pub codestyle: ToolSpec,
    pub unit_tests: ToolSpec,
    pub coverage_combine: ToolSpec,
    pub coverage_report: ToolSpec,
    pub coverage_html: ToolSpec,
    pub functional_tests: ToolSpec,
}

impl Tools {
    pub fn get(&self, step: Step) -> &ToolSpec {
        match step {
            Step::Format => &self.format,
            Step::SortImports => &self.sort_imports,
            Step::LintSource => &self.lint_source,
            Step::LintTests => &self.lint_tests,
            Step::Docstyle => &self.docstyle,
            Step::Codestyle => &self.codestyle,
            Step::UnitTests => &self.unit_tests,
            Step::CoverageCombine => &self.coverage_combine,
            Step::CoverageReport => &self.coverage_report,
            Step::CoverageHtml => &self.coverage_html,
            Step::FunctionalTests => &self.functional_tests,
        }
    }

    pub fn get_mut(&mut self, step: Step) -> &mut ToolSpec {
        match step {
            Step::Format => &mut self.format,
            Step::SortImports => &mut self.sort_imports,
            Step::LintSource => &mut self.lint_source,
            Step::LintTests => &mut self.lint_tests,
            Step::Docstyle => &mut self.docstyle,
            Step::Codestyle => &mut self.codestyle,
            Step::UnitTests => &mut self.unit_tests,
            Step::CoverageCombine => &mut self.coverage_combine,
            Step::CoverageReport => &mut self.coverage_report,
            Step::CoverageHtml => &mut self.coverage_html,
            Step::FunctionalTests => &mut self.functional_tests,
        }
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            format: ToolSpec::new("black", &[], "format"),
            sort_imports: ToolSpec::new("isort", &[], "format"),
            lint_source: ToolSpec::new("pylint", &[], "lint"),
            lint_tests: ToolSpec::new("pylint", &["--rcfile=tests/.pylintrc"], "lint"),
            docstyle: ToolSpec::new("pydocstyle", &[], "lint"),
            codestyle: ToolSpec::new("pycodestyle", &[], "lint"),
            unit_tests: ToolSpec::new(
                "coverage",
                &["run", "--parallel-mode", "-m", "pytest"],
                "tests",
            ),
            coverage_combine: ToolSpec::new("coverage", &["combine"], "coverage")
                .with_files(FileArgs::Omit),
            coverage_report: ToolSpec::new("coverage", &["report"], "coverage")
                .with_files(FileArgs::Include),
            coverage_html: ToolSpec::new("coverage", &["html"], "coverage")
                .with_files(FileArgs::Include),
            functional_tests: ToolSpec::new("pytest", &[], "functests"),
        }
    }
}

/// Classification rules and tool bindings for one repository layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    /// Anything under this prefix is a test of some kind.
    pub test_prefix: String,
    pub unit_test_prefix: String,
    pub functional_test_prefix: String,
    /// Directory a source path is mirrored under to find its test.
    pub counterpart_root: String,
    pub tools: Tools,
}

impl Profile {
    pub fn standard() -> Self {
        Self {
            name: DEFAULT_PROFILE,
            test_prefix: "tests/".to_string(),
            unit_test_prefix: "tests/unit/".to_string(),
            functional_test_prefix: "tests/functional/".to_string(),
            counterpart_root: "tests/unit/".to_string(),
            tools: Tools::default(),
        }
    }

    /// Layout with the package at `h/` and its unit tests at `tests/h/`.
    pub fn h() -> Self {
        let mut tools = Tools::default();
        tools.lint_source = ToolSpec::new("flake8", &[], "lint");
        tools.lint_tests = ToolSpec::new("flake8", &["--config=tests/.flake8"], "lint");
        Self {
            name: "h",
            unit_test_prefix: "tests/h/".to_string(),
            counterpart_root: "tests/".to_string(),
            tools,
            ..Self::standard()
        }
    }

    /// Replace tool bindings by step.
    ///
    /// An override with an empty `tox_env` keeps the environment of the binding
    /// it replaces.
    pub fn with_tool_overrides(mut self, overrides: &BTreeMap<Step, ToolSpec>) -> Self {
        for (step, spec) in overrides {
            let slot = self.tools.get_mut(*step);
            let mut spec = spec.clone();
            if spec.tox_env.is_empty() {
                spec.tox_env = slot.tox_env.clone();
            }
            *slot = spec;
        }
        self
    }
}

/// A profile that applies when its marker directory exists at the repo root.
pub struct ProfileRule {
    pub marker: &'static str,
    pub build: fn() -> Profile,
}

/// Ordered profile table; first match wins.
pub const PROFILE_RULES: &[ProfileRule] = &[ProfileRule {
    marker: "h",
    build: Profile::h,
}];

/// Pick the first profile whose marker directory exists, else the default.
pub fn select_profile(has_dir: impl Fn(&str) -> bool) -> Profile {
    PROFILE_RULES
        .iter()
        .find(|rule| has_dir(rule.marker))
        .map(|rule| (rule.build)())
        .unwrap_or_else(Profile::standard)
}

/// Look a profile up by name (`default` or a rule's profile name).
pub fn profile_by_name(name: &str) -> Option<Profile> {
    if name == DEFAULT_PROFILE {
        return Some(Profile::standard());
    }
    PROFILE_RULES
        .iter()
        .map(|rule| (rule.build)())
        .find(|profile| profile.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_defaults_without_marker() {
        let profile = select_profile(|_| false);
        assert_eq!(profile, Profile::standard());
    }

    #[test]
    fn select_h_when_marker_present() {
        let profile = select_profile(|dir| dir == "h");
        assert_eq!(profile.name, "h");
        assert_eq!(profile.unit_test_prefix, "tests/h/");
        assert_eq!(profile.tools.lint_source.program, "flake8");
    }

    #[test]
    fn profile_by_name_knows_every_profile() {
        assert_eq!(profile_by_name("default"), Some(Profile::standard()));
        assert_eq!(profile_by_name("h").map(|p| p.name), Some("h"));
        assert_eq!(profile_by_name("nope"), None);
    }

    #[test]
    fn override_keeps_tox_env_when_unset() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            Step::LintSource,
            ToolSpec::new("ruff", &["check"], ""),
        );
        let profile = Profile::standard().with_tool_overrides(&overrides);
        assert_eq!(profile.tools.lint_source.program, "ruff");
        assert_eq!(profile.tools.lint_source.args, vec!["check"]);
        assert_eq!(profile.tools.lint_source.tox_env, "lint");
        assert_eq!(profile.tools.lint_tests.program, "pylint");
    }
}
