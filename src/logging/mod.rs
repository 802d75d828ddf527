//! `tracing` subscriber setup for the `buddyvault` binary.
//!
//! Library code only emits events; installing a subscriber is up to the
//! application.

pub mod config;
mod filters;

pub use self::config::{LogFormat, LoggingConfig};
pub use filters::build_filter_from_config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Installs the global subscriber. Fails if one is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = filters::build_filter_from_config(config);

    let fmt_layer = match config.format {
        LogFormat::Compact => fmt::layer().with_writer(std::io::stderr).compact().boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).pretty().boxed(),
        LogFormat::Json => fmt::layer().with_writer(std::io::stderr).json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = config.format.as_str(),
        "Logging initialized"
    );
    Ok(())
}
