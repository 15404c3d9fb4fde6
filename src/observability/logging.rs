//! Structured logging.
//!
//! Uses the `tracing` crate with a `tracing-subscriber` formatter. The level
//! comes from `observability.log_level`; `RUST_LOG` overrides it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

/// Filter directive for a configured level: the crate logs at `level`,
/// dependencies only at `warn` and above.
pub fn default_directive(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("warn,sol_transfer={level},sol_cli={level}")
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
