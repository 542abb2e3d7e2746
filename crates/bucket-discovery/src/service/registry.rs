//! Membership registry: publish, list and prune records in the bucket.

use tracing::{debug, error, warn};

use crate::domain::{
    ClusterAddress, DiscoveryError, MembershipRecord, ObjectStoreError, RegistryConfiguration,
};
use crate::ports::{ObjectStore, TimeSource};

/// Per-cycle view over the bucket for one configuration.
///
/// Cheap to build; the lifecycle creates one per discovery cycle from the
/// client and configuration in effect for that cycle.
pub struct MembershipRegistry<'a> {
    store: &'a dyn ObjectStore,
    config: &'a RegistryConfiguration,
    time_source: &'a dyn TimeSource,
}

impl<'a> MembershipRegistry<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        config: &'a RegistryConfiguration,
        time_source: &'a dyn TimeSource,
    ) -> Self {
        Self {
            store,
            config,
            time_source,
        }
    }

    /// Write a fresh record for this node under `prefix + node_id`.
    ///
    /// Store failures are returned as-is; there is no retry.
    pub fn publish_own(
        &self,
        node_id: &str,
        address: &ClusterAddress,
    ) -> Result<MembershipRecord, DiscoveryError> {
        let record = MembershipRecord::new(node_id, address.clone(), self.time_source.now())?;
        let key = self.config.object_key(node_id);

        self.store
            .put_object(&key, &record.encode())
            .map_err(DiscoveryError::Publish)?;

        debug!(key = %key, address = %address, "Updated own record");
        Ok(record)
    }

    /// Resolve every live peer address under the prefix.
    ///
    /// Pages are consumed until the store reports no more. A fault on any
    /// listing page aborts the whole scan. Per-object faults only skip that
    /// object; expired records are deleted best-effort and left out.
    pub fn list_peers(&self) -> Result<Vec<ClusterAddress>, DiscoveryError> {
        let now = self.time_source.now();
        let prefix = &self.config.key_prefix;
        let mut addresses = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self
                .store
                .list_objects(prefix, token.as_deref())
                .map_err(DiscoveryError::Listing)?;

            for key in &page.keys {
                let Some(record) = self.read_record(key) else {
                    continue;
                };

                if record.is_expired(self.config.expiration_secs, now) {
                    debug!(
                        key = %key,
                        node_id = record.node_id(),
                        "Record is expired and will be deleted"
                    );
                    if let Err(e) = self.store.delete_object(key) {
                        warn!(key = %key, error = %e, "Could not delete expired record");
                    }
                    continue;
                }

                addresses.push(record.address().clone());
            }

            if !page.is_truncated {
                break;
            }
            match page.next_continuation_token {
                Some(next) => {
                    debug!(prefix = %prefix, "Listing is truncated, loading next page");
                    token = Some(next);
                }
                None => {
                    return Err(DiscoveryError::Listing(ObjectStoreError::InvalidResponse(
                        "truncated listing without continuation token".into(),
                    )));
                }
            }
        }

        debug!(peers = addresses.len(), "Resolved node addresses");
        Ok(addresses)
    }

    /// Remove this node's record.
    pub fn delete_own(&self, node_id: &str) -> Result<(), ObjectStoreError> {
        let key = self.config.object_key(node_id);
        self.store.delete_object(&key)?;
        debug!(key = %key, "Removed own record");
        Ok(())
    }

    fn read_record(&self, key: &str) -> Option<MembershipRecord> {
        let content = match self.store.get_object(key) {
            Ok(content) => content,
            Err(e) => {
                error!(
                    key = %key,
                    bucket = %self.config.bucket_name,
                    error = %e,
                    "Not able to read object, skipping"
                );
                return None;
            }
        };

        if content.trim().is_empty() {
            debug!(key = %key, "Object has no content, skipping");
            return None;
        }

        match MembershipRecord::decode(content.trim()) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(key = %key, reason = %e, "Object could not be parsed, skipping");
                None
            }
        }
    }
}
