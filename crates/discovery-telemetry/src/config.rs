//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or full directives)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include file and line in log lines
    pub source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "bucket-discovery".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DISCOVERY_SERVICE_NAME`: Service name (default: bucket-discovery)
    /// - `DISCOVERY_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DISCOVERY_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `DISCOVERY_LOG_SOURCE`: Include file/line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("DISCOVERY_SERVICE_NAME")
                .unwrap_or_else(|| "bucket-discovery".to_string()),

            log_level: lookup("DISCOVERY_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("DISCOVERY_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            source_location: lookup("DISCOVERY_LOG_SOURCE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}
