//! Domain Errors for Bucket Discovery
//!
//! Three families, matching how far a failure is allowed to reach:
//! - [`ConfigError`]: the configuration could not be loaded or violates a rule.
//!   Fatal to the current discovery cycle only.
//! - [`ObjectStoreError`]: a call against the object store failed. Depending on
//!   the call site this skips one object or aborts the cycle.
//! - [`RecordError`]: a stored object is not a valid membership record.
//!   Always local: the object is skipped.

use thiserror::Error;

use super::health::BucketHealth;

/// Errors raised while loading or validating the registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("could not find configuration file '{path}'")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The configuration file exists but could not be read.
    #[error("could not read configuration file '{path}': {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// The configuration file is not valid property syntax.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("bucket name is empty")]
    MissingBucketName,

    #[error("bucket region is empty")]
    MissingBucketRegion,

    #[error("bucket region '{0}' is not a valid region")]
    UnknownRegion(String),

    #[error("credentials type is empty")]
    MissingCredentialsType,

    #[error("credentials type '{0}' is not valid")]
    UnknownCredentialsType(String),

    #[error("access key id is empty")]
    MissingAccessKeyId,

    #[error("secret access key is empty")]
    MissingSecretAccessKey,

    #[error("session token is empty")]
    MissingSessionToken,

    #[error("file expiration is not set")]
    MissingExpiration,

    #[error("update interval is not set")]
    MissingUpdateInterval,

    #[error("file expiration is negative ({0})")]
    NegativeExpiration(i64),

    #[error("update interval is negative ({0})")]
    NegativeUpdateInterval(i64),

    #[error("update interval is the same as the expiration ({0}s)")]
    IntervalEqualsExpiration(u64),

    #[error("update interval is deactivated but expiration is set")]
    UpdateIntervalDisabled,

    #[error("expiration is deactivated but update interval is set")]
    ExpirationDisabled,

    /// Republishing must happen strictly before peers consider the record stale.
    #[error("update interval ({interval}s) is larger than expiration ({expiration}s)")]
    IntervalNotBelowExpiration {
        /// Configured republish interval in seconds.
        interval: u64,
        /// Configured expiration in seconds.
        expiration: u64,
    },
}

/// Errors returned by object store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectStoreError {
    /// Object or bucket does not exist.
    #[error("object '{key}' not found")]
    NotFound {
        /// Key that was requested.
        key: String,
    },

    /// Credentials lack permission for the operation.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The store answered with an unexpected status code.
    #[error("object store returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the store, if any.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The object exists but its body could not be read as text.
    #[error("object '{key}' is not retrievable: {reason}")]
    NotRetrievable {
        /// Key that was requested.
        key: String,
        /// Why the body could not be read.
        reason: String,
    },

    /// No credentials could be resolved for the configured strategy.
    #[error("credentials unavailable: {0}")]
    Credentials(String),

    /// The store answered with a body we could not interpret.
    #[error("invalid response from object store: {0}")]
    InvalidResponse(String),

    /// An operation was attempted before the client was configured.
    #[error("object store client is not configured")]
    NotConfigured,
}

/// Reasons a stored object is not a valid membership record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("content is not valid base64")]
    InvalidEncoding,

    #[error("decoded content is not valid UTF-8")]
    InvalidUtf8,

    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("unsupported record version '{0}'")]
    UnsupportedVersion(String),

    #[error("invalid creation time '{0}'")]
    InvalidCreationTime(String),

    #[error("node id is blank")]
    BlankNodeId,

    #[error("host is blank")]
    BlankHost,

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    /// Node ids and hosts may not contain the `|` character used by the separator.
    #[error("field '{0}' contains the reserved character '|'")]
    ReservedCharacter(String),
}

/// Why a discovery cycle was aborted.
///
/// Never surfaced to the host: the lifecycle logs it and returns an empty
/// address list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("configuration unavailable: {0}")]
    Config(#[from] ConfigError),

    #[error("object store unavailable: {0}")]
    Store(#[from] ObjectStoreError),

    #[error("bucket '{bucket}' is not usable: {health}")]
    Bucket {
        /// Configured bucket name.
        bucket: String,
        /// Result of the health check.
        health: BucketHealth,
    },

    #[error("own record is invalid: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("could not publish own record: {0}")]
    Publish(ObjectStoreError),

    #[error("could not list peer records: {0}")]
    Listing(ObjectStoreError),
}
