//! # Discovery Telemetry
//!
//! Observability for hosts embedding bucket discovery.
//!
//! ## Components
//!
//! - **Logging:** `tracing-subscriber` with an `EnvFilter` that keeps HTTP and
//!   TLS client internals at `warn`, plain or JSON output
//! - **Metrics:** [`PrometheusDiscoveryMetrics`], a `DiscoveryMetrics`
//!   implementation backed by a `prometheus::Registry`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use discovery_telemetry::{init_logging, PrometheusDiscoveryMetrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! let metrics = PrometheusDiscoveryMetrics::new(prometheus::Registry::new())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DISCOVERY_LOG_LEVEL` or `RUST_LOG` | `info` | Log level filter |
//! | `DISCOVERY_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `DISCOVERY_SERVICE_NAME` | `bucket-discovery` | Service name in logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, NOISY_DEPENDENCIES};
pub use metrics::{
    PrometheusDiscoveryMetrics, METRIC_FAILED_TOTAL, METRIC_RESOLVED_ADDRESSES,
    METRIC_SUCCESS_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
