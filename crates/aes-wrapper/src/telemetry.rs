//! Tracing subscriber setup for applications embedding the wrapper.
//!
//! The wrapper itself only emits events. Hosts that want them as JSON lines
//! call [`init`], or [`WrapperConfig::init_telemetry`] to use the configured
//! level.
//!
//! Events carry byte lengths and error kinds only. Key material, IVs and
//! plaintext never reach a field.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::WrapperConfig;

/// Install a global JSON subscriber filtered at `log_level`.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive or a
/// global subscriber is already installed.
pub fn init(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level {log_level:?}"))?,
    };

    Registry::default()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()
        .context("a global tracing subscriber is already installed")
}

impl WrapperConfig {
    /// [`init`] at this configuration's `log_level`.
    ///
    /// # Errors
    ///
    /// As for [`init`].
    pub fn init_telemetry(&self) -> Result<()> {
        init(&self.log_level)
    }
}
