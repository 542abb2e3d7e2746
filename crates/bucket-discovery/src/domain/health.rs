//! Bucket reachability classification.

use std::fmt;

/// Result of checking the configured bucket.
///
/// Each non-reachable variant carries different operator guidance, so the
/// lifecycle logs them separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketHealth {
    /// Bucket exists and the credentials may access it.
    Reachable,
    /// Bucket does not exist.
    DoesNotExist,
    /// Credentials are not allowed to access the bucket.
    AccessDenied,
    /// Anything else, usually a region mismatch or a transport fault.
    Other(String),
}

impl BucketHealth {
    /// Map a store status code to a health classification.
    ///
    /// 200 is reachable, 404 missing, 403 denied; everything else is `Other`
    /// carrying `cause` (or the bare status when no cause is known).
    pub fn from_status(status: u16, cause: Option<String>) -> Self {
        match status {
            200 => Self::Reachable,
            404 => Self::DoesNotExist,
            403 => Self::AccessDenied,
            other => Self::Other(cause.unwrap_or_else(|| format!("status {other}"))),
        }
    }

    /// Whether discovery may proceed against this bucket.
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable)
    }
}

impl fmt::Display for BucketHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable => write!(f, "reachable"),
            Self::DoesNotExist => write!(f, "bucket does not exist"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::Other(cause) => write!(f, "unknown error: {cause}"),
        }
    }
}
