//! # Core Domain Entities
//!
//! The four document kinds the registry writes, and where each one lives.
//!
//! | Entity | Path | Lifecycle |
//! |--------|------|-----------|
//! | `Client` | `clients/{clientId}` | created, edited, toggled, deleted |
//! | `SequenceCounter` | `sequence_counters/clients` | created on first allocation, never deleted |
//! | `LegalIdIndexEntry` | `legal_id_index/{normalized}` | moves with the client's legal ID |
//! | `AuditEntry` | `client_audit/{uuid}` | append-only |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ClientId, Collection, DocumentPath, UserId};
use uuid::Uuid;

/// A client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Immutable once assigned.
    pub client_id: ClientId,
    /// Legal ID as entered (trimmed).
    pub legal_id: String,
    /// Uniqueness key; see `normalize_legal_id`.
    pub legal_id_normalized: String,
    pub display_name: String,
    /// Ordering and search key; see `normalize_name`.
    pub normalized_name: String,
    pub email: Option<String>,
    /// Digits only.
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub active: bool,
    /// Starts at 1, incremented by every mutation.
    pub revision: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_by: UserId,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Whether two records differ in anything other than audit stamps.
    pub fn same_content(&self, other: &Client) -> bool {
        self.client_id == other.client_id
            && self.legal_id == other.legal_id
            && self.legal_id_normalized == other.legal_id_normalized
            && self.display_name == other.display_name
            && self.normalized_name == other.normalized_name
            && self.email == other.email
            && self.phone == other.phone
            && self.address == other.address
            && self.contact_name == other.contact_name
            && self.active == other.active
    }

    /// Record a mutation: bump the revision and the `updated_*` stamps.
    pub fn touch(&mut self, acting_user: &UserId, now: DateTime<Utc>) {
        self.revision += 1;
        self.updated_by = acting_user.clone();
        self.updated_at = now;
    }

    pub fn path(&self) -> DocumentPath {
        client_path(&self.client_id)
    }
}

/// Singleton counter behind client-ID allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceCounter {
    pub last_number: u64,
}

/// Uniqueness index record: normalized legal ID -> owning client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalIdIndexEntry {
    pub client_id: ClientId,
}

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Activated,
    Deactivated,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Activated => "activated",
            AuditAction::Deactivated => "deactivated",
            AuditAction::Deleted => "deleted",
        }
    }

    /// Action recorded when the active flag is set to `active`.
    pub fn for_active_state(active: bool) -> Self {
        if active {
            AuditAction::Activated
        } else {
            AuditAction::Deactivated
        }
    }
}

/// Append-only record of a client mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub audit_id: Uuid,
    pub action: AuditAction,
    pub client_id: ClientId,
    /// Client revision this entry produced (for deletes: the prior revision + 1).
    pub revision: u64,
    pub before: Option<Client>,
    pub after: Option<Client>,
    pub reason: Option<String>,
    pub acting_user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        client_id: ClientId,
        revision: u64,
        acting_user: &UserId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            action,
            client_id,
            revision,
            before: None,
            after: None,
            reason: None,
            acting_user_id: acting_user.clone(),
            timestamp,
        }
    }

    pub fn with_before(mut self, client: Client) -> Self {
        self.before = Some(client);
        self
    }

    pub fn with_after(mut self, client: Client) -> Self {
        self.after = Some(client);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn path(&self) -> DocumentPath {
        DocumentPath::new(Collection::ClientAudit, self.audit_id.to_string())
    }
}

// =============================================================================
// DOCUMENT PATHS
// =============================================================================

pub fn client_path(client_id: &ClientId) -> DocumentPath {
    DocumentPath::new(Collection::Clients, client_id.as_str())
}

pub fn counter_path(counter_name: &str) -> DocumentPath {
    DocumentPath::new(Collection::SequenceCounters, counter_name)
}

pub fn legal_index_path(legal_id_normalized: &str) -> DocumentPath {
    DocumentPath::new(Collection::LegalIdIndex, legal_id_normalized)
}
