//! Cross-crate integration tests against the in-memory bucket.

pub mod config_reload;
pub mod e2e_membership;
pub mod flows;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use bucket_discovery::test_utils::{ManualTimeSource, RecordingStoreFactory};
    use bucket_discovery::{
        ConfigProvider, DiscoveryLifecycle, DiscoveryMetrics, InMemoryObjectStore,
        RegistryConfiguration, StaticConfigProvider,
    };

    pub const T0: u64 = 1_700_000_000_000;

    pub fn cluster_config() -> RegistryConfiguration {
        RegistryConfiguration {
            key_prefix: "cluster/".into(),
            expiration_secs: 360,
            republish_interval_secs: 180,
            ..RegistryConfiguration::for_testing("cluster-discovery")
        }
    }

    /// A lifecycle wired to `store` with a shared clock.
    pub fn node(
        store: &InMemoryObjectStore,
        clock: &Arc<ManualTimeSource>,
        metrics: Arc<dyn DiscoveryMetrics>,
    ) -> DiscoveryLifecycle {
        node_with_config(store, clock, metrics, Arc::new(StaticConfigProvider::new(cluster_config())))
    }

    pub fn node_with_config(
        store: &InMemoryObjectStore,
        clock: &Arc<ManualTimeSource>,
        metrics: Arc<dyn DiscoveryMetrics>,
        config: Arc<dyn ConfigProvider>,
    ) -> DiscoveryLifecycle {
        DiscoveryLifecycle::new(config, Arc::new(RecordingStoreFactory::new(store.clone())))
            .with_time_source(clock.clone())
            .with_metrics(metrics)
    }
}
