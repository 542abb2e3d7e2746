//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! - `config` - static and TOML file configuration providers
//! - `time` - system clock
//! - `metrics` - in-process atomic counters
//! - `memory` - in-memory object store for tests and local runs
//! - `s3` - AWS SDK S3 adapter (feature `s3`)

pub mod config;
pub mod memory;
pub mod metrics;
pub mod time;

#[cfg(feature = "s3")]
pub mod s3;

pub use config::StaticConfigProvider;
#[cfg(feature = "config-file")]
pub use config::TomlConfigProvider;
pub use memory::{InMemoryObjectStore, InMemoryStoreFactory};
pub use metrics::AtomicDiscoveryMetrics;
pub use time::SystemTimeSource;

#[cfg(feature = "s3")]
pub use s3::{S3ObjectStore, S3StoreFactory};
