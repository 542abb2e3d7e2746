//! # Discovery Flows
//!
//! Listing behavior seen through the full lifecycle:
//!
//! 1. **Pagination**: every page of a truncated listing is consumed
//! 2. **Per-object isolation**: foreign, blank and unreadable objects are skipped
//! 3. **Metrics**: lifecycle outcomes reach the Prometheus registry

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bucket_discovery::test_utils::ManualTimeSource;
    use bucket_discovery::{
        AtomicDiscoveryMetrics, BucketHealth, ClusterAddress, ClusterDiscoveryApi,
        InMemoryObjectStore, MembershipRecord, ObjectStoreError, Timestamp,
    };
    use discovery_telemetry::PrometheusDiscoveryMetrics;

    use crate::integration::fixtures::{node, T0};

    fn own() -> ClusterAddress {
        ClusterAddress::new("10.0.0.1", 7800)
    }

    fn seed(store: &InMemoryObjectStore, node_id: &str, host: &str, created_at: u64) {
        let record = MembershipRecord::new(
            node_id,
            ClusterAddress::new(host, 7800),
            Timestamp::from_millis(created_at),
        )
        .unwrap();
        store.insert(format!("cluster/{node_id}"), record.encode());
    }

    // =========================================================================
    // PAGINATION
    // =========================================================================

    #[test]
    fn test_join_reads_every_page() {
        let store = InMemoryObjectStore::with_page_size(2);
        for i in 2..=6 {
            seed(&store, &format!("N{i}"), &format!("10.0.0.{i}"), T0);
        }
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut lifecycle = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        let peers = lifecycle.join("A1", &own());

        assert_eq!(peers.len(), 6);
        assert_eq!(peers[0], own());
        assert_eq!(peers[5], ClusterAddress::new("10.0.0.6", 7800));
        // 6 keys at 2 per page
        assert_eq!(store.list_count(), 3);
        assert_eq!(store.continuation_count(), 2);
    }

    #[test]
    fn test_fault_on_later_page_aborts_cycle() {
        let store = InMemoryObjectStore::with_page_size(2);
        for i in 2..=4 {
            seed(&store, &format!("N{i}"), &format!("10.0.0.{i}"), T0);
        }
        store.fail_list_page(1, ObjectStoreError::Transport("connection reset".into()));
        let clock = Arc::new(ManualTimeSource::new(T0));
        let metrics = Arc::new(AtomicDiscoveryMetrics::new());
        let mut lifecycle = node(&store, &clock, metrics.clone());

        assert!(lifecycle.join("A1", &own()).is_empty());
        assert_eq!(metrics.failure_count(), 1);

        // The next cycle lists cleanly again.
        assert_eq!(lifecycle.refresh("A1", &own()).len(), 4);
        assert_eq!(metrics.success_count(), 1);
    }

    // =========================================================================
    // PER-OBJECT ISOLATION
    // =========================================================================

    #[test]
    fn test_bad_objects_do_not_hide_good_ones() {
        let store = InMemoryObjectStore::new();
        seed(&store, "B1", "10.0.0.2", T0);
        store.insert("cluster/blank", "   ");
        store.insert("cluster/garbage", "%%% not base64 %%%");
        store.insert("cluster/readme.txt", "aGVsbG8gd29ybGQ=");
        seed(&store, "C1", "10.0.0.3", T0);
        store.fail_get(
            "cluster/C1",
            ObjectStoreError::NotRetrievable {
                key: "cluster/C1".into(),
                reason: "body truncated".into(),
            },
        );
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut lifecycle = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        let peers = lifecycle.join("A1", &own());

        assert_eq!(peers, vec![own(), ClusterAddress::new("10.0.0.2", 7800)]);
        // Invalid objects are skipped, never deleted.
        assert!(store.content("cluster/garbage").is_some());
        assert!(store.content("cluster/C1").is_some());
    }

    #[test]
    fn test_expired_delete_failure_still_hides_record() {
        let store = InMemoryObjectStore::new();
        seed(&store, "B1", "10.0.0.2", T0);
        store.fail_delete("cluster/B1", ObjectStoreError::AccessDenied("delete".into()));
        let clock = Arc::new(ManualTimeSource::new(T0 + 400_000));
        let mut lifecycle = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        assert_eq!(lifecycle.join("A1", &own()), vec![own()]);
        assert!(store.content("cluster/B1").is_some());
    }

    // =========================================================================
    // METRICS
    // =========================================================================

    #[test]
    fn test_prometheus_metrics_follow_lifecycle() {
        let store = InMemoryObjectStore::new();
        seed(&store, "B1", "10.0.0.2", T0);
        let clock = Arc::new(ManualTimeSource::new(T0));
        let metrics = PrometheusDiscoveryMetrics::new(prometheus::Registry::new()).unwrap();
        let mut lifecycle = node(&store, &clock, Arc::new(metrics.clone()));

        lifecycle.join("A1", &own());
        assert_eq!(metrics.success_total(), 1);
        assert_eq!(metrics.resolved_addresses(), 2);

        store.set_health(BucketHealth::AccessDenied);
        assert!(lifecycle.refresh("A1", &own()).is_empty());
        assert_eq!(metrics.failed_total(), 1);
        assert_eq!(metrics.resolved_addresses(), 0);

        let text = metrics.encode().unwrap();
        assert!(text.contains("discovery_query_success_total 1"));
        assert!(text.contains("discovery_query_failed_total 1"));
        assert!(text.contains("discovery_resolved_addresses 0"));
    }
}
