//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the lifecycle API a hosting process drives
//! - **Driven Ports (Outbound):** object storage, configuration, time and
//!   metrics, supplied by adapters

pub mod inbound;
pub mod outbound;

pub use inbound::ClusterDiscoveryApi;
pub use outbound::{
    ConfigProvider, DiscoveryMetrics, ObjectListing, ObjectStore, ObjectStoreFactory, TimeSource,
};
