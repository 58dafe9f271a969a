//! Logging setup for fob-paths.
//!
//! Diagnostics go to stderr through `tracing`, so command output on stdout
//! stays machine readable.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for the plugin and the CLI
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. warnings, so rejected aliases are visible by default

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "fob_plugin_tsconfig_paths=debug,fob_paths_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "fob_plugin_tsconfig_paths=warn,fob_paths_cli=info";

/// Build the filter for the given global flags.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
