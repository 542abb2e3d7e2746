//! Join, refresh and leave for one node.
//!
//! Each cycle loads configuration, checks the bucket, publishes the own
//! record when due and then lists peers. A fault anywhere aborts the cycle
//! and yields an empty peer list; the next cycle starts from scratch.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::adapters::metrics::AtomicDiscoveryMetrics;
use crate::adapters::time::SystemTimeSource;
use crate::domain::{
    BucketHealth, ClusterAddress, DiscoveryError, LifecycleState, MembershipRecord,
    RegistryConfiguration,
};
use crate::ports::{
    ClusterDiscoveryApi, ConfigProvider, DiscoveryMetrics, ObjectStore, ObjectStoreFactory,
    TimeSource,
};

use super::registry::MembershipRegistry;
use super::store_client::StoreClient;

/// Which lifecycle callback a cycle runs for. Only used for log wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Join,
    Refresh,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Join => f.write_str("initial discovery"),
            Phase::Refresh => f.write_str("discovery refresh"),
        }
    }
}

/// Discovery lifecycle for one node: `Joining → Active → Left`.
///
/// Owns the store client and the "own record" state. Every call runs to
/// completion on the caller's thread and blocks on store I/O. A host that
/// may call from several threads wraps the lifecycle in one mutex.
///
/// # Example
///
/// ```rust,ignore
/// use bucket_discovery::service::DiscoveryLifecycle;
///
/// let mut lifecycle = DiscoveryLifecycle::new(config_provider, store_factory);
/// let peers = lifecycle.join("A1", &ClusterAddress::new("10.0.0.1", 7800));
/// // ... on the host's own schedule:
/// let peers = lifecycle.refresh("A1", &ClusterAddress::new("10.0.0.1", 7800));
/// lifecycle.leave("A1");
/// ```
pub struct DiscoveryLifecycle {
    config_provider: Arc<dyn ConfigProvider>,
    store_client: StoreClient,
    time_source: Arc<dyn TimeSource>,
    metrics: Arc<dyn DiscoveryMetrics>,
    state: LifecycleState,
    own_record: Option<MembershipRecord>,
}

impl DiscoveryLifecycle {
    /// Create a lifecycle using system time and in-process atomic metrics.
    pub fn new(
        config_provider: Arc<dyn ConfigProvider>,
        store_factory: Arc<dyn ObjectStoreFactory>,
    ) -> Self {
        Self {
            config_provider,
            store_client: StoreClient::new(store_factory),
            time_source: Arc::new(SystemTimeSource),
            metrics: Arc::new(AtomicDiscoveryMetrics::new()),
            state: LifecycleState::Joining,
            own_record: None,
        }
    }

    /// Replace the time source.
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Replace the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn DiscoveryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The last record this node published, if any.
    pub fn own_record(&self) -> Option<&MembershipRecord> {
        self.own_record.as_ref()
    }

    /// The metrics sink every cycle reports to.
    pub fn metrics(&self) -> &Arc<dyn DiscoveryMetrics> {
        &self.metrics
    }

    /// Client wrapper that rebuilds the store when configuration changes.
    pub fn store_client(&self) -> &StoreClient {
        &self.store_client
    }

    /// Load configuration, (re)configure the client and check the bucket.
    fn prepare(
        &mut self,
        phase: Phase,
    ) -> Result<(RegistryConfiguration, Arc<dyn ObjectStore>), DiscoveryError> {
        let config = self.config_provider.load().map_err(|e| {
            error!(error = %e, "Configuration couldn't be loaded, skipping {phase}");
            e
        })?;

        let store = self.store_client.configure(&config).map_err(|e| {
            error!(
                bucket = %config.bucket_name,
                error = %e,
                "Object store client couldn't be created, skipping {phase}"
            );
            e
        })?;

        let health = store.check_bucket_health();
        if !health.is_reachable() {
            log_bucket_health(phase, &config.bucket_name, &health);
            return Err(DiscoveryError::Bucket {
                bucket: config.bucket_name.clone(),
                health,
            });
        }

        Ok((config, store))
    }

    /// Run one join or refresh cycle.
    ///
    /// A listing failure after a successful publish still leaves the node
    /// `Active`.
    fn run_cycle(
        &mut self,
        phase: Phase,
        node_id: &str,
        address: &ClusterAddress,
    ) -> Result<Vec<ClusterAddress>, DiscoveryError> {
        let (config, store) = self.prepare(phase)?;
        let registry = MembershipRegistry::new(store.as_ref(), &config, self.time_source.as_ref());

        let republish = match (&self.own_record, phase) {
            (_, Phase::Join) | (None, _) => true,
            (Some(own), Phase::Refresh) => {
                own.is_expired(config.republish_interval_secs, self.time_source.now())
            }
        };

        if republish {
            let record = registry.publish_own(node_id, address).map_err(|e| {
                error!(node_id = node_id, error = %e, "Own record couldn't be published, skipping {phase}");
                e
            })?;
            self.own_record = Some(record);
            if self.state == LifecycleState::Joining {
                info!(node_id = node_id, address = %address, "Joined cluster");
                self.state = LifecycleState::Active;
            }
        } else {
            debug!(node_id = node_id, "Own record is still fresh, not republishing");
        }

        registry.list_peers().map_err(|e| {
            error!(error = %e, "Unknown error while reading node records");
            e
        })
    }

    fn discover(&mut self, phase: Phase, node_id: &str, address: &ClusterAddress) -> Vec<ClusterAddress> {
        if self.state == LifecycleState::Left {
            warn!(node_id = node_id, "Node already left the cluster, ignoring {phase}");
            return Vec::new();
        }

        match self.run_cycle(phase, node_id, address) {
            Ok(peers) => {
                self.metrics.record_success(peers.len());
                peers
            }
            Err(_) => {
                self.metrics.record_failure();
                Vec::new()
            }
        }
    }
}

fn log_bucket_health(phase: Phase, bucket: &str, health: &BucketHealth) {
    match health {
        BucketHealth::Reachable => {}
        BucketHealth::DoesNotExist => {
            error!(bucket = bucket, "Configured bucket doesn't exist, skipping {phase}");
        }
        BucketHealth::AccessDenied => {
            error!(
                bucket = bucket,
                "No permission for configured bucket. Please check your credentials and security settings. Skipping {phase}"
            );
        }
        BucketHealth::Other(cause) => {
            error!(
                bucket = bucket,
                "Unknown error occurred when checking configured bucket. Please check your s3-bucket-region setting. Skipping {phase}"
            );
            debug!(bucket = bucket, cause = %cause, "Bucket check failure cause");
        }
    }
}

impl ClusterDiscoveryApi for DiscoveryLifecycle {
    fn join(&mut self, node_id: &str, address: &ClusterAddress) -> Vec<ClusterAddress> {
        self.discover(Phase::Join, node_id, address)
    }

    fn refresh(&mut self, node_id: &str, address: &ClusterAddress) -> Vec<ClusterAddress> {
        self.discover(Phase::Refresh, node_id, address)
    }

    fn leave(&mut self, node_id: &str) {
        if self.state == LifecycleState::Left {
            warn!(node_id = node_id, "Node already left the cluster");
            return;
        }

        if self.own_record.take().is_some() {
            match (self.store_client.store(), self.store_client.config()) {
                (Some(store), Some(config)) => {
                    let registry =
                        MembershipRegistry::new(store.as_ref(), config, self.time_source.as_ref());
                    if let Err(e) = registry.delete_own(node_id) {
                        error!(
                            node_id = node_id,
                            error = %e,
                            "Own record couldn't be removed, it will expire on its own"
                        );
                    }
                }
                _ => warn!(node_id = node_id, "No object store client, own record left in place"),
            }
        }

        info!(node_id = node_id, "Left cluster");
        self.state = LifecycleState::Left;
    }
}
