//! Naming convention linking a source file to its unit test.
//!
//! `P/F.py` pairs with `<counterpart_root>P/F_test.py`. The mapping is only used
//! to decide whether an existing file joins the change set.

use crate::core::classifier::{is_python, normalize};
use crate::core::profile::Profile;

const TEST_SUFFIX: &str = "_test.py";

/// Test path for a source path, or `None` for non-Python or test paths.
pub fn source_to_test(path: &str, profile: &Profile) -> Option<String> {
    let path = normalize(path);
    if !is_python(path) || path.starts_with(&profile.test_prefix) {
        return None;
    }
    let stem = path.strip_suffix(".py")?;
    Some(format!("{}{stem}{TEST_SUFFIX}", profile.counterpart_root))
}

/// Source path for a test path, or `None` when `path` does not follow the convention.
pub fn test_to_source(path: &str, profile: &Profile) -> Option<String> {
    let rel = normalize(path).strip_prefix(&profile.counterpart_root)?;
    let stem = rel.strip_suffix(TEST_SUFFIX)?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some(format!("{stem}.py"))
}
