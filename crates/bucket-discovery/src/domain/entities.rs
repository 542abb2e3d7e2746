//! Core Domain Entities for Bucket Discovery

use std::fmt;

/// Wall-clock instant in milliseconds since the Unix epoch.
///
/// Record creation times and expiry checks are all expressed in this unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the epoch.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns this timestamp shifted forward by `secs` seconds, saturating.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs.saturating_mul(1_000)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Network address at which a cluster node accepts cluster traffic.
///
/// The host is kept as an opaque string: it may be an IP literal or a DNS
/// name, whatever the host process advertises.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterAddress {
    /// Host name or IP literal.
    pub host: String,
    /// Port number.
    pub port: u16,
}

impl ClusterAddress {
    /// Create a new cluster address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ClusterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Lifecycle phase of a discovery participant.
///
/// ```text
/// Joining ──join ok──→ Active ──leave──→ Left
///    │                   │
///    └─ failure: stays   └─ refresh: stays
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Not yet announced; `join` has not succeeded.
    #[default]
    Joining,
    /// Own record published at least once; refreshing periodically.
    Active,
    /// Left the cluster. Terminal.
    Left,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joining => write!(f, "joining"),
            Self::Active => write!(f, "active"),
            Self::Left => write!(f, "left"),
        }
    }
}
