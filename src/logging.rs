use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `VUESWEEP_LOG=debug`.
pub const LOG_ENV: &str = "VUESWEEP_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for tables and JSON.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "vuesweep=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
