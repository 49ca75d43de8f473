//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::{LogFormat, ObservabilityConfig};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("auth_site={level},console_cli={level},tower_http={level}", level = config.log_level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config)))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
    }
    Ok(())
}
