//! Tracing subscriber setup
//!
//! Logs go to stderr so they never interleave with prompt output on stdout.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber
///
/// `default_level` applies unless `RUST_LOG` supplies its own directives.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(default_level: Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
