//! Log output setup.
//!
//! `RUST_LOG` wins when set. Otherwise `-v` flags raise the level, falling
//! back to `logging.level` from the configuration. Logs go to stderr so
//! they never mix with command output.

use crate::context::AppContext;
use crate::format::should_color;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
pub fn default_filter(ctx: &AppContext) -> String {
    ctx.verbosity
        .log_filter()
        .map(str::to_string)
        .unwrap_or_else(|| ctx.config.logging.level.clone())
}

/// Installs the global tracing subscriber.
pub fn init(ctx: &AppContext) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(ctx)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(should_color(ctx))
        .with_target(false)
        .try_init();
}
