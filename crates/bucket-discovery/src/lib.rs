//! # Bucket Discovery
//!
//! Cluster membership discovery that uses a shared object-storage bucket as
//! the rendezvous point. Every node writes a small record under a common key
//! prefix and lists that prefix to learn the addresses of its peers. Stale
//! records are pruned by whichever node notices them first.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** record codec, configuration rules, bucket health, errors
//! - **Ports Layer:** `ClusterDiscoveryApi` (inbound) and the object store,
//!   configuration, time and metrics traits (outbound)
//! - **Service Layer:** store client holder, membership registry and the
//!   `join`/`refresh`/`leave` lifecycle
//! - **Adapters Layer:** in-memory and S3 object stores, config providers,
//!   system clock, atomic metrics
//!
//! ## Features
//!
//! - `s3` - S3 adapter on the AWS SDK, one credential provider per strategy
//! - `config-file` - TOML property file provider
//! - `test-utils` - `ManualTimeSource`, `RecordingStoreFactory`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bucket_discovery::{
//!     ClusterAddress, ClusterDiscoveryApi, DiscoveryLifecycle, InMemoryObjectStore,
//!     InMemoryStoreFactory, LifecycleState, RegistryConfiguration, StaticConfigProvider,
//! };
//!
//! let bucket = InMemoryObjectStore::new();
//! let config = StaticConfigProvider::new(RegistryConfiguration::for_testing("cluster"));
//! let mut node = DiscoveryLifecycle::new(
//!     Arc::new(config),
//!     Arc::new(InMemoryStoreFactory::new(bucket.clone())),
//! );
//!
//! let me = ClusterAddress::new("10.0.0.1", 7800);
//! let peers = node.join("A1", &me);
//! assert_eq!(peers, vec![me]);
//! assert_eq!(node.state(), LifecycleState::Active);
//!
//! node.leave("A1");
//! assert!(bucket.is_empty());
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (ManualTimeSource, RecordingStoreFactory)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use domain::{
    BucketHealth, ClusterAddress, ConfigError, CredentialsConfig, CredentialsType,
    DiscoveryError, LifecycleState, MembershipRecord, ObjectStoreError, RecordError,
    RegistryConfiguration, RegistryProperties, Secret, Timestamp, RECORD_FORMAT_VERSION,
    RECORD_SEPARATOR,
};

pub use ports::{
    ClusterDiscoveryApi, ConfigProvider, DiscoveryMetrics, ObjectListing, ObjectStore,
    ObjectStoreFactory, TimeSource,
};

pub use service::{DiscoveryLifecycle, MembershipRegistry, StoreClient};

pub use adapters::{
    AtomicDiscoveryMetrics, InMemoryObjectStore, InMemoryStoreFactory, StaticConfigProvider,
    SystemTimeSource,
};

#[cfg(feature = "config-file")]
pub use adapters::TomlConfigProvider;

#[cfg(feature = "s3")]
pub use adapters::{S3ObjectStore, S3StoreFactory};
