//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for embedding applications
//! - Configure log level from the environment or the manifest
//!
//! # Design Decisions
//! - `RUST_LOG` takes precedence over the configured level
//! - Installing twice is an error, not a panic

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install a global fmt subscriber filtered by `RUST_LOG` or `config.log_level`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}
