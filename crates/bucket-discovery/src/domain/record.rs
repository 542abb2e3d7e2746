//! Membership record and its storage codec.
//!
//! ## Wire Format
//!
//! ```text
//! base64( "4" "||||" <created_at_ms> "||||" <node_id> "||||" <host> "||||" <port> )
//! ```
//!
//! The version literal and the four-pipe separator are shared by every node
//! reading the bucket. Changing either requires a coordinated version bump:
//! nodes silently ignore records with any other version.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::entities::{ClusterAddress, Timestamp};
use super::errors::RecordError;

/// Format version written into every record.
pub const RECORD_FORMAT_VERSION: &str = "4";

/// Separator between record fields before the base64 transform.
pub const RECORD_SEPARATOR: &str = "||||";

const FIELD_COUNT: usize = 5;

/// One node's advertisement, stored under `prefix + node_id`.
///
/// Immutable once built. Republishing creates a new record with a fresh
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRecord {
    node_id: String,
    address: ClusterAddress,
    created_at: Timestamp,
}

impl MembershipRecord {
    /// Build a record, enforcing the record invariants.
    ///
    /// # Errors
    ///
    /// - `BlankNodeId` / `BlankHost` for empty or whitespace-only fields
    /// - `ReservedCharacter` if the node id or host contains `|`
    /// - `InvalidCreationTime` if `created_at` is zero
    pub fn new(
        node_id: impl Into<String>,
        address: ClusterAddress,
        created_at: Timestamp,
    ) -> Result<Self, RecordError> {
        let node_id = node_id.into();
        if node_id.trim().is_empty() {
            return Err(RecordError::BlankNodeId);
        }
        if address.host.trim().is_empty() {
            return Err(RecordError::BlankHost);
        }
        for field in [&node_id, &address.host] {
            if field.contains('|') {
                return Err(RecordError::ReservedCharacter(field.clone()));
            }
        }
        if created_at.as_millis() == 0 {
            return Err(RecordError::InvalidCreationTime("0".into()));
        }
        Ok(Self {
            node_id,
            address,
            created_at,
        })
    }

    /// Identifier of the advertising node.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Address the node accepts cluster traffic on.
    pub fn address(&self) -> &ClusterAddress {
        &self.address
    }

    /// When this record was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Serialize into the stored text form.
    pub fn encode(&self) -> String {
        let created_at = self.created_at.as_millis().to_string();
        let port = self.address.port.to_string();
        let content = [
            RECORD_FORMAT_VERSION,
            created_at.as_str(),
            self.node_id.as_str(),
            self.address.host.as_str(),
            port.as_str(),
        ]
        .join(RECORD_SEPARATOR);
        STANDARD.encode(content.as_bytes())
    }

    /// Parse the stored text form.
    ///
    /// Never panics: any corrupt or foreign object yields an error so the
    /// listing pass can skip it.
    pub fn decode(content: &str) -> Result<Self, RecordError> {
        let bytes = STANDARD
            .decode(content.as_bytes())
            .map_err(|_| RecordError::InvalidEncoding)?;
        let content = String::from_utf8(bytes).map_err(|_| RecordError::InvalidUtf8)?;

        let fields: Vec<&str> = content.split(RECORD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(RecordError::FieldCount(fields.len()));
        }

        let version = fields[0];
        if version != RECORD_FORMAT_VERSION {
            return Err(RecordError::UnsupportedVersion(version.to_string()));
        }

        let created_at: u64 = fields[1]
            .parse()
            .map_err(|_| RecordError::InvalidCreationTime(fields[1].to_string()))?;

        let node_id = fields[2];
        if node_id.is_empty() {
            return Err(RecordError::BlankNodeId);
        }
        let host = fields[3];
        if host.is_empty() {
            return Err(RecordError::BlankHost);
        }

        let port: u16 = fields[4]
            .parse()
            .map_err(|_| RecordError::InvalidPort(fields[4].to_string()))?;

        Self::new(
            node_id,
            ClusterAddress::new(host, port),
            Timestamp::from_millis(created_at),
        )
    }

    /// Whether the record is older than `expiration_secs` at `now`.
    ///
    /// An expiration of 0 disables expiry: the record never expires.
    pub fn is_expired(&self, expiration_secs: u64, now: Timestamp) -> bool {
        if expiration_secs == 0 {
            return false;
        }
        self.created_at.plus_secs(expiration_secs) < now
    }
}
