//! # Driving Ports (Inbound API)
//!
//! The callbacks a hosting process invokes to take part in discovery.

use crate::domain::ClusterAddress;

/// Host-driven discovery lifecycle.
///
/// The host calls [`join`](Self::join) once, [`refresh`](Self::refresh) on its
/// own schedule, and [`leave`](Self::leave) exactly once at shutdown. None of
/// the calls fail: a cycle that could not complete returns an empty list and
/// is visible only through logs and metrics.
///
/// # Example
///
/// ```rust,ignore
/// use bucket_discovery::{ClusterAddress, ClusterDiscoveryApi};
///
/// fn announce<T: ClusterDiscoveryApi>(api: &mut T) {
///     let me = ClusterAddress::new("10.0.0.1", 7800);
///     let peers = api.join("A1", &me);
///     println!("{} peers visible", peers.len());
/// }
/// ```
pub trait ClusterDiscoveryApi {
    /// Announce this node and return the currently visible peer addresses.
    ///
    /// The own address may be part of the result.
    fn join(&mut self, node_id: &str, address: &ClusterAddress) -> Vec<ClusterAddress>;

    /// Republish the own record if it is due and return the visible peers.
    fn refresh(&mut self, node_id: &str, address: &ClusterAddress) -> Vec<ClusterAddress>;

    /// Withdraw the own record, best-effort.
    fn leave(&mut self, node_id: &str);
}
