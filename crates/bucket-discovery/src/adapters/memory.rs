//! In-memory object store.
//!
//! Behaves like a single bucket: keys are listed in lexicographic order and
//! split into pages of a configurable size. Faults can be injected per key
//! or per listing call so failure paths can be exercised without a network.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{BucketHealth, ObjectStoreError, RegistryConfiguration};
use crate::ports::{ObjectListing, ObjectStore, ObjectStoreFactory};

/// Default number of keys per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Default)]
struct Counters {
    puts: usize,
    gets: usize,
    deletes: usize,
    lists: usize,
    continuations: usize,
}

#[derive(Debug)]
struct State {
    objects: BTreeMap<String, String>,
    health: BucketHealth,
    put_fault: Option<ObjectStoreError>,
    get_faults: HashMap<String, ObjectStoreError>,
    delete_faults: HashMap<String, ObjectStoreError>,
    list_faults: HashMap<usize, ObjectStoreError>,
    counters: Counters,
}

impl Default for State {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            health: BucketHealth::Reachable,
            put_fault: None,
            get_faults: HashMap::new(),
            delete_faults: HashMap::new(),
            list_faults: HashMap::new(),
            counters: Counters::default(),
        }
    }
}

/// Shared-state bucket handle.
///
/// Clones share the same objects, faults and counters, so several
/// lifecycles (one per simulated node) can meet in the same bucket.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    state: Arc<Mutex<State>>,
    page_size: usize,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a store that returns at most `page_size` keys per listing call.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            page_size: page_size.max(1),
        }
    }

    pub fn insert(&self, key: impl Into<String>, content: impl Into<String>) {
        self.state.lock().objects.insert(key.into(), content.into());
    }

    pub fn content(&self, key: &str) -> Option<String> {
        self.state.lock().objects.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().objects.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().objects.is_empty()
    }

    /// Override the result of the bucket health check.
    pub fn set_health(&self, health: BucketHealth) {
        self.state.lock().health = health;
    }

    /// Fail every subsequent put with `error`.
    pub fn fail_puts(&self, error: ObjectStoreError) {
        self.state.lock().put_fault = Some(error);
    }

    pub fn fail_get(&self, key: impl Into<String>, error: ObjectStoreError) {
        self.state.lock().get_faults.insert(key.into(), error);
    }

    pub fn fail_delete(&self, key: impl Into<String>, error: ObjectStoreError) {
        self.state.lock().delete_faults.insert(key.into(), error);
    }

    /// Fail the listing call with zero-based index `call` (counted over the
    /// store's lifetime).
    pub fn fail_list_page(&self, call: usize, error: ObjectStoreError) {
        self.state.lock().list_faults.insert(call, error);
    }

    /// Remove every injected fault and restore a reachable bucket.
    pub fn clear_faults(&self) {
        let mut state = self.state.lock();
        state.health = BucketHealth::Reachable;
        state.put_fault = None;
        state.get_faults.clear();
        state.delete_faults.clear();
        state.list_faults.clear();
    }

    pub fn put_count(&self) -> usize {
        self.state.lock().counters.puts
    }

    pub fn get_count(&self) -> usize {
        self.state.lock().counters.gets
    }

    pub fn delete_count(&self) -> usize {
        self.state.lock().counters.deletes
    }

    pub fn list_count(&self) -> usize {
        self.state.lock().counters.lists
    }

    /// Listing calls that carried a continuation token.
    pub fn continuation_count(&self) -> usize {
        self.state.lock().counters.continuations
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn check_bucket_health(&self) -> BucketHealth {
        self.state.lock().health.clone()
    }

    fn put_object(&self, key: &str, content: &str) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock();
        state.counters.puts += 1;
        if let Some(error) = &state.put_fault {
            return Err(error.clone());
        }
        state.objects.insert(key.to_string(), content.to_string());
        Ok(())
    }

    fn get_object(&self, key: &str) -> Result<String, ObjectStoreError> {
        let mut state = self.state.lock();
        state.counters.gets += 1;
        if let Some(error) = state.get_faults.get(key) {
            return Err(error.clone());
        }
        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                key: key.to_string(),
            })
    }

    fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock();
        state.counters.deletes += 1;
        if let Some(error) = state.delete_faults.get(key) {
            return Err(error.clone());
        }
        state.objects.remove(key);
        Ok(())
    }

    fn list_objects(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing, ObjectStoreError> {
        let mut state = self.state.lock();
        let call = state.counters.lists;
        state.counters.lists += 1;
        if continuation_token.is_some() {
            state.counters.continuations += 1;
        }
        if let Some(error) = state.list_faults.get(&call) {
            return Err(error.clone());
        }

        // The token is the last key of the previous page.
        let mut matching = state
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| continuation_token.map_or(true, |after| key.as_str() > after));

        let keys: Vec<String> = matching.by_ref().take(self.page_size).cloned().collect();
        let is_truncated = matching.next().is_some();
        let next_continuation_token = if is_truncated { keys.last().cloned() } else { None };

        Ok(ObjectListing {
            keys,
            is_truncated,
            next_continuation_token,
        })
    }
}

/// Factory handing out fresh handles onto one shared in-memory bucket.
///
/// Each `create` returns a new `Arc`, so a rebuilt client is observable,
/// while the data stays shared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreFactory {
    store: InMemoryObjectStore,
}

impl InMemoryStoreFactory {
    pub fn new(store: InMemoryObjectStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryObjectStore {
        &self.store
    }
}

impl ObjectStoreFactory for InMemoryStoreFactory {
    fn create(&self, _config: &RegistryConfiguration) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        Ok(Arc::new(self.store.clone()))
    }
}
