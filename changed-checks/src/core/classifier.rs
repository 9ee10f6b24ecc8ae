//! Deterministic classification of changed paths.

use crate::core::profile::Profile;
use crate::core::types::FileKind;

const PYTHON_SUFFIX: &str = ".py";

/// Classify a repo-relative path under `profile`.
///
/// - `UnitTest` / `FunctionalTest` when under the matching prefix.
/// - `OtherTest` when under the test prefix but neither of the above.
/// - `Source` otherwise, including non-Python files.
pub fn classify_path(path: &str, profile: &Profile) -> FileKind {
    let path = normalize(path);
    if path.starts_with(&profile.unit_test_prefix) {
        FileKind::UnitTest
    } else if path.starts_with(&profile.functional_test_prefix) {
        FileKind::FunctionalTest
    } else if path.starts_with(&profile.test_prefix) {
        FileKind::OtherTest
    } else {
        FileKind::Source
    }
}

pub fn is_python(path: &str) -> bool {
    path.ends_with(PYTHON_SUFFIX)
}

/// Strip a leading `./` so `git` output and hand-typed paths compare equal.
pub fn normalize(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}
