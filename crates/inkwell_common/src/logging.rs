//! Logging utilities for the Inkwell application.
//!
//! One standardized `tracing` setup shared by the binary and by tests that
//! want log output.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default INFO level.
///
/// Should be called once at the start of the application.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives still apply on top; the level here only sets the
/// default when no directive matches.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // try_init: a test harness may already have installed a subscriber
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
