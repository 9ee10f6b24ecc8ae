//! Run formatters, linters and tests against only the files a branch touches.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (classification, counterpart
//!   mapping, profiles, dispatch planning). No I/O.
//! - **[`io`]**: Side-effecting operations (git queries, config files, child
//!   processes), behind traits so tests can substitute fakes.
//!
//! [`dispatch`] coordinates the two to implement the CLI.

pub mod core;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
