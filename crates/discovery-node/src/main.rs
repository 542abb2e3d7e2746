//! # Discovery Node
//!
//! Reference host for bucket discovery.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from the environment
//! 2. Read host settings (`DISCOVERY_*` variables)
//! 3. Join the cluster
//! 4. Refresh every `DISCOVERY_REFRESH_SECS`
//! 5. Leave on Ctrl+C
//!
//! Lifecycle calls block on object store I/O, so each one runs on the
//! blocking pool behind a single mutex.

mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use bucket_discovery::{
    ClusterAddress, ClusterDiscoveryApi, DiscoveryLifecycle, S3StoreFactory, TomlConfigProvider,
};
use discovery_telemetry::{init_logging, PrometheusDiscoveryMetrics, TelemetryConfig};

use crate::settings::NodeSettings;

/// A host process taking part in discovery.
struct DiscoveryNode {
    lifecycle: Arc<Mutex<DiscoveryLifecycle>>,
    settings: NodeSettings,
    metrics: PrometheusDiscoveryMetrics,
}

impl DiscoveryNode {
    fn new(settings: NodeSettings, metrics: PrometheusDiscoveryMetrics) -> Self {
        let config_provider = Arc::new(TomlConfigProvider::new(settings.config_path.clone()));
        let lifecycle = DiscoveryLifecycle::new(config_provider, Arc::new(S3StoreFactory::new()))
            .with_metrics(Arc::new(metrics.clone()));

        Self {
            lifecycle: Arc::new(Mutex::new(lifecycle)),
            settings,
            metrics,
        }
    }

    /// Run `op` against the lifecycle on the blocking pool.
    async fn call<F>(&self, op: F) -> Result<Vec<ClusterAddress>>
    where
        F: FnOnce(&mut DiscoveryLifecycle, &str, &ClusterAddress) -> Vec<ClusterAddress>
            + Send
            + 'static,
    {
        let lifecycle = Arc::clone(&self.lifecycle);
        let node_id = self.settings.node_id.clone();
        let address = self.settings.address.clone();

        tokio::task::spawn_blocking(move || {
            let mut lifecycle = lifecycle.lock();
            op(&mut *lifecycle, &node_id, &address)
        })
        .await
        .context("Discovery task panicked")
    }

    fn report(&self, phase: &str, peers: &[ClusterAddress]) {
        let addresses: Vec<String> = peers.iter().map(ToString::to_string).collect();
        info!(
            phase = phase,
            peers = peers.len(),
            addresses = ?addresses,
            success_total = self.metrics.success_total(),
            failed_total = self.metrics.failed_total(),
            "Discovery cycle finished"
        );
    }

    async fn run_until_shutdown(&self) -> Result<()> {
        info!(
            node_id = %self.settings.node_id,
            address = %self.settings.address,
            config = %self.settings.config_path.display(),
            "Joining cluster"
        );
        let peers = self.call(|lifecycle, id, addr| lifecycle.join(id, addr)).await?;
        self.report("join", &peers);

        let mut ticker = interval(self.settings.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!("Node is running. Press Ctrl+C to stop.");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let peers = self
                        .call(|lifecycle, id, addr| lifecycle.refresh(id, addr))
                        .await?;
                    self.report("refresh", &peers);
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl+C")?;
                    break;
                }
            }
        }

        info!("Initiating graceful shutdown...");
        self.call(|lifecycle, id, _| {
            lifecycle.leave(id);
            Vec::new()
        })
        .await?;

        if let Ok(text) = self.metrics.encode() {
            debug!(metrics = %text, "Final discovery metrics");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry)?;

    let settings = NodeSettings::from_env().context("Invalid node settings")?;
    let metrics = PrometheusDiscoveryMetrics::new(prometheus::Registry::new())?;

    DiscoveryNode::new(settings, metrics)
        .run_until_shutdown()
        .await
}
