//! The set of touched paths and its classified, Python-only subsets.

use std::collections::BTreeSet;

use crate::core::classifier::{classify_path, is_python, normalize};
use crate::core::counterpart::{source_to_test, test_to_source};
use crate::core::profile::Profile;
use crate::core::types::FileKind;

/// Deduplicated, sorted set of repo-relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<String>,
}

impl ChangeSet {
    /// Union of the modified-since-base and untracked listings.
    pub fn from_discovery<I, J>(modified: I, untracked: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let paths = modified
            .into_iter()
            .chain(untracked)
            .map(|path| normalize(&path).to_string())
            .filter(|path| !path.is_empty())
            .collect();
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Add the counterpart of every source and unit-test path that exists.
    ///
    /// Single pass: counterparts added here are not themselves augmented.
    pub fn augment(&self, profile: &Profile, exists: impl Fn(&str) -> bool) -> ChangeSet {
        let mut paths = self.paths.clone();
        for path in &self.paths {
            let counterpart = match classify_path(path, profile) {
                FileKind::Source => source_to_test(path, profile),
                FileKind::UnitTest => test_to_source(path, profile),
                FileKind::FunctionalTest | FileKind::OtherTest => None,
            };
            if let Some(counterpart) = counterpart
                && exists(&counterpart)
            {
                paths.insert(counterpart);
            }
        }
        ChangeSet { paths }
    }

    /// Split into per-kind Python subsets, each in sorted order.
    pub fn classify(&self, profile: &Profile) -> Classified {
        let mut classified = Classified::default();
        for path in self.iter().filter(|path| is_python(path)) {
            classified.python.push(path.to_string());
            let bucket = match classify_path(path, profile) {
                FileKind::Source => &mut classified.sources,
                FileKind::UnitTest => &mut classified.unit_tests,
                FileKind::FunctionalTest => &mut classified.functional_tests,
                FileKind::OtherTest => &mut classified.other_tests,
            };
            bucket.push(path.to_string());
        }
        classified
    }
}

/// Python files of a change set, grouped by [`FileKind`].
///
/// Non-Python paths appear in none of these lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub python: Vec<String>,
    pub sources: Vec<String>,
    pub unit_tests: Vec<String>,
    pub functional_tests: Vec<String>,
    pub other_tests: Vec<String>,
}

impl Classified {
    /// Every Python test file, sorted.
    pub fn tests(&self) -> Vec<String> {
        let mut tests: Vec<String> = self
            .unit_tests
            .iter()
            .chain(&self.functional_tests)
            .chain(&self.other_tests)
            .cloned()
            .collect();
        tests.sort();
        tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> ChangeSet {
        ChangeSet::from_discovery(paths.iter().map(|p| p.to_string()), Vec::new())
    }

    #[test]
    fn discovery_unions_and_dedupes() {
        let changes = ChangeSet::from_discovery(
            vec!["b.py".to_string(), "a.py".to_string()],
            vec!["a.py".to_string(), "./c.py".to_string(), "".to_string()],
        );
        let paths: Vec<&str> = changes.iter().collect();
        assert_eq!(paths, vec!["a.py", "b.py", "c.py"]);
    }

    #[test]
    fn discovery_keeps_non_ascii_and_spaced_paths() {
        let profile = Profile::standard();
        let changes = ChangeSet::from_discovery(
            vec!["src/café.py".to_string()],
            vec!["src/ odd.py".to_string()],
        );
        let classified = changes.classify(&profile);
        assert_eq!(classified.sources, vec!["src/ odd.py", "src/café.py"]);
    }

    #[test]
    fn augment_adds_existing_test() {
        let profile = Profile::standard();
        let changes = set(&["src/foo.py"]);
        let augmented = changes.augment(&profile, |p| p == "tests/unit/src/foo_test.py");
        let paths: Vec<&str> = augmented.iter().collect();
        assert_eq!(paths, vec!["src/foo.py", "tests/unit/src/foo_test.py"]);
    }

    #[test]
    fn augment_adds_existing_source() {
        let profile = Profile::standard();
        let changes = set(&["tests/unit/src/foo_test.py"]);
        let augmented = changes.augment(&profile, |p| p == "src/foo.py");
        assert!(augmented.contains("src/foo.py"));
        assert_eq!(augmented.len(), 2);
    }

    #[test]
    fn augment_never_adds_missing_files() {
        let profile = Profile::standard();
        let changes = set(&["src/foo.py", "tests/unit/lib/bar_test.py", "docs/x.md"]);
        let augmented = changes.augment(&profile, |_| false);
        assert_eq!(augmented, changes);
    }

    #[test]
    fn augment_skips_functional_tests() {
        let profile = Profile::standard();
        let changes = set(&["tests/functional/login_test.py"]);
        let augmented = changes.augment(&profile, |_| true);
        assert_eq!(augmented, changes);
    }

    #[test]
    fn augment_is_single_pass() {
        let profile = Profile::standard();
        let changes = set(&["tests/unit/src/foo_test.py"]);
        let asked = std::cell::RefCell::new(Vec::new());
        let augmented = changes.augment(&profile, |p| {
            asked.borrow_mut().push(p.to_string());
            true
        });
        assert_eq!(*asked.borrow(), vec!["src/foo.py".to_string()]);
        assert_eq!(augmented.len(), 2);
    }

    #[test]
    fn classify_groups_python_only() {
        let profile = Profile::standard();
        let changes = set(&[
            "README.md",
            "src/foo.py",
            "tests/conftest.py",
            "tests/functional/login_test.py",
            "tests/unit/src/foo_test.py",
        ]);
        let classified = changes.classify(&profile);
        assert_eq!(classified.sources, vec!["src/foo.py"]);
        assert_eq!(classified.unit_tests, vec!["tests/unit/src/foo_test.py"]);
        assert_eq!(
            classified.functional_tests,
            vec!["tests/functional/login_test.py"]
        );
        assert_eq!(classified.other_tests, vec!["tests/conftest.py"]);
        assert_eq!(classified.python.len(), 4);
        assert_eq!(
            classified.tests(),
            vec![
                "tests/conftest.py",
                "tests/functional/login_test.py",
                "tests/unit/src/foo_test.py",
            ]
        );
    }

    #[test]
    fn non_python_paths_are_inert() {
        let profile = Profile::standard();
        let classified = set(&["Makefile", "tests/unit/data.json"]).classify(&profile);
        assert_eq!(classified, Classified::default());
    }
}
