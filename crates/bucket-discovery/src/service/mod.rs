//! # Discovery Service
//!
//! Wires the domain to the ports:
//! - [`StoreClient`] keeps one object store client per configuration
//! - [`MembershipRegistry`] publishes, lists and prunes records
//! - [`DiscoveryLifecycle`] implements the host-driven `join`/`refresh`/`leave`
//!   state machine on top of both

mod lifecycle;
mod registry;
mod store_client;

pub use lifecycle::DiscoveryLifecycle;
pub use registry::MembershipRegistry;
pub use store_client::StoreClient;
