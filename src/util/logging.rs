// evtx-triage - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
// The library itself only emits tracing events; this initialiser is for
// embedding applications and integration tests that want them rendered.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - `debug_flag` argument (host application's --debug switch)
//
// Output: stderr. Payload text is only ever logged as bounded previews;
// never logs full record contents at any level.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the host application requested debug output.
///
/// Priority: RUST_LOG env var > debug_flag > default "info".
pub fn init(debug_flag: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    tracing::debug!(
        crate_name = super::constants::CRATE_NAME,
        version = super::constants::CRATE_VERSION,
        "Logging initialised"
    );
}
