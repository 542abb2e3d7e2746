//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the discovery core requires from its environment.

use std::sync::Arc;

use crate::domain::{
    BucketHealth, ConfigError, ObjectStoreError, RegistryConfiguration, Timestamp,
};

/// One page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Keys on this page, in store order.
    pub keys: Vec<String>,
    /// Whether more pages remain.
    pub is_truncated: bool,
    /// Opaque token for the next page; set when `is_truncated` is true.
    pub next_continuation_token: Option<String>,
}

/// Key/value object storage scoped to one configured bucket.
///
/// Implementations block on I/O and must be `Send + Sync` so a client
/// handle can be shared with the host's worker threads.
pub trait ObjectStore: Send + Sync {
    /// Check whether the bucket exists and is accessible. Never retries.
    fn check_bucket_health(&self) -> BucketHealth;

    /// Store `content` under `key`, replacing any previous value.
    fn put_object(&self, key: &str, content: &str) -> Result<(), ObjectStoreError>;

    /// Fetch the full body of `key` as text.
    ///
    /// Fails with `NotRetrievable` if the body cannot be read.
    fn get_object(&self, key: &str) -> Result<String, ObjectStoreError>;

    /// Delete `key`. A missing object is not an error.
    fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError>;

    /// List keys under `prefix`, starting after `continuation_token` when given.
    fn list_objects(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing, ObjectStoreError>;
}

/// Builds an [`ObjectStore`] for a validated configuration.
///
/// Credential resolution happens here, so an unsupported or broken
/// credential setup surfaces as an error before any request is made.
pub trait ObjectStoreFactory: Send + Sync {
    /// Create a client for `config`.
    fn create(&self, config: &RegistryConfiguration) -> Result<Arc<dyn ObjectStore>, ObjectStoreError>;
}

/// Source of the registry configuration.
///
/// Called at the start of every discovery cycle, so file-backed providers
/// pick up edits without a restart.
pub trait ConfigProvider: Send + Sync {
    /// Load and validate the current configuration.
    fn load(&self) -> Result<RegistryConfiguration, ConfigError>;
}

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Sink for discovery outcome metrics.
pub trait DiscoveryMetrics: Send + Sync {
    /// A cycle completed its listing and resolved `peers` addresses.
    fn record_success(&self, peers: usize);

    /// A cycle was aborted. The resolved-address gauge drops to zero.
    fn record_failure(&self);
}
