//! Prometheus metrics for discovery cycles.
//!
//! ## Metric Types
//!
//! - **Counter**: `discovery_query_success_total`, `discovery_query_failed_total`
//! - **Gauge**: `discovery_resolved_addresses`, peers resolved by the last cycle

use bucket_discovery::DiscoveryMetrics;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::TelemetryError;

pub const METRIC_SUCCESS_TOTAL: &str = "discovery_query_success_total";
pub const METRIC_FAILED_TOTAL: &str = "discovery_query_failed_total";
pub const METRIC_RESOLVED_ADDRESSES: &str = "discovery_resolved_addresses";

/// `DiscoveryMetrics` backed by a Prometheus registry.
///
/// Clones share the same underlying collectors.
#[derive(Clone)]
pub struct PrometheusDiscoveryMetrics {
    registry: Registry,
    success: IntCounter,
    failed: IntCounter,
    resolved: IntGauge,
}

impl PrometheusDiscoveryMetrics {
    /// Create the collectors and register them with `registry`.
    ///
    /// Fails if `registry` already holds collectors with these names.
    pub fn new(registry: Registry) -> Result<Self, TelemetryError> {
        let init = |e: prometheus::Error| TelemetryError::MetricsInit(e.to_string());

        let success = IntCounter::new(
            METRIC_SUCCESS_TOTAL,
            "Discovery cycles that completed a listing",
        )
        .map_err(init)?;
        let failed = IntCounter::new(
            METRIC_FAILED_TOTAL,
            "Discovery cycles aborted before a listing completed",
        )
        .map_err(init)?;
        let resolved = IntGauge::new(
            METRIC_RESOLVED_ADDRESSES,
            "Peer addresses resolved by the most recent discovery cycle",
        )
        .map_err(init)?;

        registry.register(Box::new(success.clone())).map_err(init)?;
        registry.register(Box::new(failed.clone())).map_err(init)?;
        registry.register(Box::new(resolved.clone())).map_err(init)?;

        Ok(Self {
            registry,
            success,
            failed,
            resolved,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn success_total(&self) -> u64 {
        self.success.get()
    }

    pub fn failed_total(&self) -> u64 {
        self.failed.get()
    }

    pub fn resolved_addresses(&self) -> i64 {
        self.resolved.get()
    }

    /// Encode the registry in Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

impl DiscoveryMetrics for PrometheusDiscoveryMetrics {
    fn record_success(&self, peers: usize) {
        self.success.inc();
        self.resolved.set(i64::try_from(peers).unwrap_or(i64::MAX));
    }

    fn record_failure(&self) {
        self.failed.inc();
        self.resolved.set(0);
    }
}
