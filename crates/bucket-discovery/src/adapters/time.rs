//! Wall-clock time source.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::Timestamp;
use crate::ports::TimeSource;

/// Production time source using the system clock.
///
/// # Example
///
/// ```rust
/// use bucket_discovery::adapters::time::SystemTimeSource;
/// use bucket_discovery::ports::TimeSource;
///
/// let now = SystemTimeSource::new().now();
/// assert!(now.as_millis() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::from_millis(duration.as_millis() as u64)
    }
}
