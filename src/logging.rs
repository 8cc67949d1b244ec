//! Diagnostic logging on stderr.
//!
//! Stdout carries cards (or JSON) only, so scripts can consume it; all
//! diagnostics go through `tracing` to stderr. `RUST_LOG` takes precedence
//! over the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("candidate_scout={0},scout={0}", default_level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
