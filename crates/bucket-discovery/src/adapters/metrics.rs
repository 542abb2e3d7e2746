//! In-process discovery metrics.
//!
//! ## Metrics Exported
//!
//! - Completed discovery cycles
//! - Aborted discovery cycles
//! - Addresses resolved by the last cycle

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::DiscoveryMetrics;

/// Lock-free counters readable by the host.
#[derive(Debug, Default)]
pub struct AtomicDiscoveryMetrics {
    /// Cycles that completed a peer listing
    pub success_total: AtomicU64,
    /// Cycles aborted before or during the listing
    pub failure_total: AtomicU64,
    /// Peer addresses returned by the most recent cycle
    pub resolved_addresses: AtomicU64,
}

impl AtomicDiscoveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> u64 {
        self.success_total.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_total.load(Ordering::Relaxed)
    }

    pub fn resolved_count(&self) -> u64 {
        self.resolved_addresses.load(Ordering::Relaxed)
    }
}

impl DiscoveryMetrics for AtomicDiscoveryMetrics {
    fn record_success(&self, peers: usize) {
        self.success_total.fetch_add(1, Ordering::Relaxed);
        self.resolved_addresses.store(peers as u64, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failure_total.fetch_add(1, Ordering::Relaxed);
        self.resolved_addresses.store(0, Ordering::Relaxed);
    }
}
