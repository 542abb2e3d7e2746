//! Configuration-aware holder for the object store client.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ObjectStoreError, RegistryConfiguration};
use crate::ports::{ObjectStore, ObjectStoreFactory};

/// Owns the current object store client and the configuration it was built from.
///
/// [`configure`](Self::configure) only rebuilds the client when the
/// configuration differs by value from the one in use, so an unchanged
/// configuration keeps the existing client and its open connections.
pub struct StoreClient {
    factory: Arc<dyn ObjectStoreFactory>,
    current: Option<(RegistryConfiguration, Arc<dyn ObjectStore>)>,
    generation: u64,
}

impl StoreClient {
    /// Create an unconfigured holder.
    pub fn new(factory: Arc<dyn ObjectStoreFactory>) -> Self {
        Self {
            factory,
            current: None,
            generation: 0,
        }
    }

    /// Make sure the client matches `config`, rebuilding it if needed.
    ///
    /// On a failed rebuild the previous client stays in place.
    pub fn configure(
        &mut self,
        config: &RegistryConfiguration,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        if let Some((existing, store)) = &self.current {
            if existing == config {
                debug!(bucket = %config.bucket_name, "Configuration unchanged, reusing object store client");
                return Ok(Arc::clone(store));
            }
        }

        let store = self.factory.create(config)?;
        self.generation += 1;
        info!(
            bucket = %config.bucket_name,
            region = %config.bucket_region,
            credentials = %config.credentials.credentials_type(),
            generation = self.generation,
            "Object store client configured"
        );
        self.current = Some((config.clone(), Arc::clone(&store)));
        Ok(store)
    }

    /// Current client, if one was ever built.
    pub fn store(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.current.as_ref().map(|(_, store)| store)
    }

    /// Configuration the current client was built from.
    pub fn config(&self) -> Option<&RegistryConfiguration> {
        self.current.as_ref().map(|(config, _)| config)
    }

    /// Number of times a client has been built.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
