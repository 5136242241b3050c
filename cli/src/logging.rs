//! Logging setup for the shell.
//!
//! Logs go to stderr so command output on stdout stays readable. `RUST_LOG`
//! overrides the default filter; `DEBUG_LOGGING=1` turns on debug output for
//! the clanboard crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();
    let directive = if debug_logging {
        "warn,clanboard_core=debug,clanboard_cli=debug"
    } else {
        "warn,clanboard_core=info,clanboard_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(debug_logging, "logging initialized");
}
