//! Telemetry: structured logging.
//!
//! The library emits `tracing` events and `metrics` counters; it installs a
//! subscriber only when asked to and never installs a metrics exporter.
//!
//! # Example
//!
//! ```rust,no_run
//! use garrison_core::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::default();
//! init_telemetry(&config).expect("Failed to initialize telemetry");
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};

use serde::Deserialize;

/// Unified telemetry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Environment (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "garrison".to_string()
}

fn default_environment() -> String {
    std::env::var("GARRISON_ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// Initialize logging for the configured environment.
///
/// Call once at startup.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.logging, &config.environment)?;

    ::tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );
    Ok(())
}
