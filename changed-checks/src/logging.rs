//! Diagnostics for change discovery and dispatch, enabled through `RUST_LOG`.
//!
//! Events emitted at `debug`:
//!
//! - `toplevel`: repository root resolved from the starting directory.
//! - `modified_since` / `untracked` spans: `count` of paths each git query returned.
//! - `prepare` span (`base_ref`, `profile`): `discovered` and `augmented`
//!   change-set sizes.
//! - tool runner span (`step`, `program`): `args` before spawning, `code` after.
//!
//! A stopping failure is logged at `info` with `step` and `code`. The
//! `--verbose` command echo is product output and goes to stderr whatever the
//! filter says.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. Falls back to `warn` when `RUST_LOG` is unset
/// or unparsable.
///
/// ```bash
/// RUST_LOG=changed_checks=debug changed-checks --dry-run
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}
