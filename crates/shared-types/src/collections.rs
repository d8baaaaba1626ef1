//! # Document Addressing
//!
//! Logical collections of the document store and the `collection/id` paths
//! that address individual documents inside them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical collections written by the client registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    /// `clients/{clientId}`
    Clients,
    /// `sequence_counters/{name}`
    SequenceCounters,
    /// `legal_id_index/{normalizedLegalId}`
    LegalIdIndex,
    /// `client_audit/{auditId}`
    ClientAudit,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Clients,
        Collection::SequenceCounters,
        Collection::LegalIdIndex,
        Collection::ClientAudit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::SequenceCounters => "sequence_counters",
            Collection::LegalIdIndex => "legal_id_index",
            Collection::ClientAudit => "client_audit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentPath {
    pub collection: Collection,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }

    /// Storage key form (`clients/000001`), used by byte-keyed backends.
    pub fn key(&self) -> String {
        format!("{}/{}", self.collection.as_str(), self.id)
    }

    /// Inverse of [`DocumentPath::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        let (collection, id) = key.split_once('/')?;
        Some(Self::new(Collection::from_name(collection)?, id))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection.as_str(), self.id)
    }
}
