//! Logging setup
//!
//! Crumbs logs through the standard `log` facade (`log::debug!`,
//! `log::warn!`, ...). Applications that do not install their own logger can
//! call [`init_logging`] once at startup to get an `env_logger` backend.

use crate::config::LoggingConfig;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` with the configured filter
///
/// Safe to call multiple times; only the first call has an effect. A logger
/// installed elsewhere is left in place.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    config.validate()?;

    INIT.call_once(|| {
        let result = env_logger::Builder::new()
            .parse_filters(&config.level)
            .format_timestamp_millis()
            .try_init();

        if let Err(e) = result {
            log::debug!("Logger already installed, keeping it: {}", e);
        }
    });

    Ok(())
}
