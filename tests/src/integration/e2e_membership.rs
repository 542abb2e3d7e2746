//! # End-to-End Membership
//!
//! Several lifecycles share one bucket and one clock:
//!
//! ```text
//! A1 join ──→ [A]
//! B1 join ──→ [A, B]
//!   +361s
//! B1 refresh ──→ [B]      (A's record expired and is deleted)
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bucket_discovery::test_utils::ManualTimeSource;
    use bucket_discovery::{
        AtomicDiscoveryMetrics, ClusterAddress, ClusterDiscoveryApi, InMemoryObjectStore,
        LifecycleState, MembershipRecord,
    };

    use crate::integration::fixtures::{node, T0};

    fn a() -> ClusterAddress {
        ClusterAddress::new("10.0.0.1", 7800)
    }

    fn b() -> ClusterAddress {
        ClusterAddress::new("10.0.0.2", 7800)
    }

    #[test]
    fn test_second_node_sees_first() {
        let store = InMemoryObjectStore::new();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut node_a = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));
        let mut node_b = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        assert_eq!(node_a.join("A1", &a()), vec![a()]);
        assert_eq!(node_b.join("B1", &b()), vec![a(), b()]);

        let record = MembershipRecord::decode(&store.content("cluster/A1").unwrap()).unwrap();
        assert_eq!(record.node_id(), "A1");
        assert_eq!(record.address(), &a());
    }

    #[test]
    fn test_silent_node_expires_and_is_pruned() {
        let store = InMemoryObjectStore::new();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut node_a = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));
        let mut node_b = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        node_a.join("A1", &a());
        node_b.join("B1", &b());

        // A crashes without leaving; B keeps refreshing.
        clock.advance_secs(361);
        let peers = node_b.refresh("B1", &b());

        assert_eq!(peers, vec![b()]);
        assert!(store.content("cluster/A1").is_none());
        assert_eq!(store.keys(), vec!["cluster/B1".to_string()]);
    }

    #[test]
    fn test_refreshing_nodes_stay_visible() {
        let store = InMemoryObjectStore::new();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut node_a = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));
        let mut node_b = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        node_a.join("A1", &a());
        node_b.join("B1", &b());

        // Refresh cadence below the republish interval: records are renewed
        // before peers consider them stale.
        for _ in 0..10 {
            clock.advance_secs(100);
            node_a.refresh("A1", &a());
            assert_eq!(node_b.refresh("B1", &b()), vec![a(), b()]);
        }
        assert_eq!(store.keys().len(), 2);
    }

    #[test]
    fn test_leave_removes_node_for_others() {
        let store = InMemoryObjectStore::new();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut node_a = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));
        let mut node_b = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        node_a.join("A1", &a());
        node_b.join("B1", &b());
        node_a.leave("A1");

        assert_eq!(node_a.state(), LifecycleState::Left);
        assert_eq!(node_b.refresh("B1", &b()), vec![b()]);
        assert!(node_a.refresh("A1", &a()).is_empty());
    }

    #[test]
    fn test_rejoin_after_restart_overwrites_record() {
        let store = InMemoryObjectStore::new();
        let clock = Arc::new(ManualTimeSource::new(T0));
        let mut first = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));
        first.join("A1", &a());

        // Same node id, new address, fresh process.
        clock.advance_secs(30);
        let moved = ClusterAddress::new("10.0.0.9", 7800);
        let mut restarted = node(&store, &clock, Arc::new(AtomicDiscoveryMetrics::new()));

        assert_eq!(restarted.join("A1", &moved), vec![moved.clone()]);
        let record = MembershipRecord::decode(&store.content("cluster/A1").unwrap()).unwrap();
        assert_eq!(record.address(), &moved);
    }
}
