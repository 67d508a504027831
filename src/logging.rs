//! Diagnostic logging to stderr.
//!
//! Level precedence: `WHISPERER_LOG` (full `EnvFilter` syntax), then
//! `--verbose`, then the configured `log-level`.

use std::io;

use tracing::warn;
use tracing_subscriber::EnvFilter;

const ENV_VAR: &str = "WHISPERER_LOG";

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(configured_level: &str, verbose: bool) {
    let mut rejected = None;
    let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { configured_level };
        EnvFilter::try_new(level).unwrap_or_else(|_| {
            rejected = Some(level.to_string());
            EnvFilter::new("warn")
        })
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok();

    if installed && let Some(level) = rejected {
        warn!(%level, "unrecognized log level, using warn");
    }
}
