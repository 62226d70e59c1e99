//! Shared tracing setup for the meter ledger binaries.

use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when the variable is unset or invalid.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_directive, "logger initialized");
    }
}

/// Default directive for the `meter` binary: chatty for our crates, quiet elsewhere.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,meter=debug,record_store=debug,billing_engine=debug,settings_loader=debug"
    } else {
        "warn,meter=info,record_store=info,billing_engine=info"
    }
}
