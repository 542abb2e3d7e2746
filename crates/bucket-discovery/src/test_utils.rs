//! Test utilities for bucket discovery.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use bucket_discovery::test_utils::ManualTimeSource;
//! use bucket_discovery::TimeSource;
//!
//! let time = ManualTimeSource::new(1_000);
//! time.advance_secs(2);
//! assert_eq!(time.now().as_millis(), 3_000);
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapters::memory::{InMemoryObjectStore, InMemoryStoreFactory};
use crate::domain::{ObjectStoreError, RegistryConfiguration, Timestamp};
use crate::ports::{ObjectStore, ObjectStoreFactory, TimeSource};

/// Thread-safe clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    millis: AtomicU64,
}

impl ManualTimeSource {
    /// Start at `millis` since the epoch.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_millis(secs * 1_000);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// In-memory store factory that records every build.
///
/// Can be told to fail the next build to exercise client setup errors.
#[derive(Debug)]
pub struct RecordingStoreFactory {
    inner: InMemoryStoreFactory,
    created: AtomicUsize,
    configs: Mutex<Vec<RegistryConfiguration>>,
    next_failure: Mutex<Option<ObjectStoreError>>,
}

impl RecordingStoreFactory {
    pub fn new(store: InMemoryObjectStore) -> Self {
        Self {
            inner: InMemoryStoreFactory::new(store),
            created: AtomicUsize::new(0),
            configs: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
        }
    }

    /// The shared bucket every built client talks to.
    pub fn store(&self) -> &InMemoryObjectStore {
        self.inner.store()
    }

    /// Number of successful builds.
    pub fn create_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Configurations passed to successful builds, oldest first.
    pub fn configs(&self) -> Vec<RegistryConfiguration> {
        self.configs.lock().clone()
    }

    /// Fail the next build with `error`.
    pub fn fail_next(&self, error: ObjectStoreError) {
        *self.next_failure.lock() = Some(error);
    }
}

impl ObjectStoreFactory for RecordingStoreFactory {
    fn create(&self, config: &RegistryConfiguration) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        if let Some(error) = self.next_failure.lock().take() {
            return Err(error);
        }
        let store = self.inner.create(config)?;
        self.created.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().push(config.clone());
        Ok(store)
    }
}
