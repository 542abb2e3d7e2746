//! # Configuration Reload
//!
//! The property file is read on every cycle. Edits take effect on the next
//! refresh without restarting the node, and a broken file only costs the
//! cycles that see it.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use bucket_discovery::test_utils::{ManualTimeSource, RecordingStoreFactory};
    use bucket_discovery::{
        AtomicDiscoveryMetrics, ClusterAddress, ClusterDiscoveryApi, DiscoveryLifecycle,
        InMemoryObjectStore, LifecycleState, TomlConfigProvider,
    };

    use crate::integration::fixtures::T0;

    const PROPERTIES: &str = r#"
s3-bucket-name = "cluster-discovery"
s3-bucket-region = "eu-west-1"
file-prefix = "cluster/"
file-expiration = 360
update-interval = 180
credentials-type = "default"
"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        path: std::path::PathBuf,
        store: InMemoryObjectStore,
        factory: Arc<RecordingStoreFactory>,
        metrics: Arc<AtomicDiscoveryMetrics>,
        lifecycle: DiscoveryLifecycle,
    }

    fn fixture(content: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.toml");
        fs::write(&path, content).unwrap();

        let store = InMemoryObjectStore::new();
        let factory = Arc::new(RecordingStoreFactory::new(store.clone()));
        let metrics = Arc::new(AtomicDiscoveryMetrics::new());
        let lifecycle = DiscoveryLifecycle::new(
            Arc::new(TomlConfigProvider::new(path.clone())),
            factory.clone(),
        )
        .with_time_source(Arc::new(ManualTimeSource::new(T0)))
        .with_metrics(metrics.clone());

        Fixture {
            _dir: dir,
            path,
            store,
            factory,
            metrics,
            lifecycle,
        }
    }

    fn own() -> ClusterAddress {
        ClusterAddress::new("10.0.0.1", 7800)
    }

    #[test]
    fn test_join_from_property_file() {
        let mut f = fixture(PROPERTIES);

        assert_eq!(f.lifecycle.join("A1", &own()), vec![own()]);
        assert!(f.store.content("cluster/A1").is_some());
        assert_eq!(f.factory.configs()[0].bucket_region, "eu-west-1");
    }

    #[test]
    fn test_unchanged_file_keeps_client() {
        let mut f = fixture(PROPERTIES);

        f.lifecycle.join("A1", &own());
        f.lifecycle.refresh("A1", &own());
        f.lifecycle.refresh("A1", &own());

        assert_eq!(f.factory.create_count(), 1);
    }

    #[test]
    fn test_edited_file_rebuilds_client() {
        let mut f = fixture(PROPERTIES);
        f.lifecycle.join("A1", &own());

        fs::write(&f.path, PROPERTIES.replace("eu-west-1", "eu-central-1")).unwrap();
        f.lifecycle.refresh("A1", &own());

        assert_eq!(f.factory.create_count(), 2);
        assert_eq!(f.factory.configs()[1].bucket_region, "eu-central-1");
    }

    #[test]
    fn test_broken_file_skips_cycle_only() {
        let mut f = fixture(PROPERTIES);
        f.lifecycle.join("A1", &own());

        fs::write(&f.path, PROPERTIES.replace("update-interval = 180", "update-interval = 360"))
            .unwrap();
        assert!(f.lifecycle.refresh("A1", &own()).is_empty());
        assert_eq!(f.metrics.failure_count(), 1);
        assert_eq!(f.lifecycle.state(), LifecycleState::Active);

        fs::write(&f.path, PROPERTIES).unwrap();
        assert_eq!(f.lifecycle.refresh("A1", &own()), vec![own()]);
        assert_eq!(f.factory.create_count(), 1);
    }

    #[test]
    fn test_missing_file_blocks_join() {
        let mut f = fixture(PROPERTIES);
        fs::remove_file(&f.path).unwrap();

        assert!(f.lifecycle.join("A1", &own()).is_empty());
        assert_eq!(f.lifecycle.state(), LifecycleState::Joining);
        assert_eq!(f.factory.create_count(), 0);

        fs::write(&f.path, PROPERTIES).unwrap();
        assert_eq!(f.lifecycle.refresh("A1", &own()), vec![own()]);
        assert_eq!(f.lifecycle.state(), LifecycleState::Active);
    }
}
