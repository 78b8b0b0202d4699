//! Diagnostic logging for the binary.
//!
//! Library code emits `tracing` events; this installs the subscriber. Logs go
//! to stderr so stdout stays the human-readable report.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the verbosity flags. `quiet` wins.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_directive(verbose, quiet))
    };

    // Already installed (e.g. in tests) is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
