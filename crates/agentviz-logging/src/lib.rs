//! # agentviz-logging
//!
//! Diagnostics and event output for agentviz.
//!
//! Diagnostics go through `tracing` to stderr; normalized events are
//! printed to stdout by [`EventPrinter`].
//!
//! ## Key Types
//!
//! - [`EventPrinter`] - Renders normalized events
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)

mod events;

pub use events::{EventPrinter, LogFormat};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}
