//! # Read Queries
//!
//! Non-transactional reads of committed state for admin screens and the CLI.

use shared_types::{ClientId, Collection, DocumentPath};
use tracing::debug_span;

use super::codec::decode;
use super::ClientRegistryService;
use crate::domain::entities::{client_path, legal_index_path, AuditEntry, Client, LegalIdIndexEntry};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::normalize::{normalize_legal_id, normalize_name};
use crate::domain::value_objects::ClientFilter;
use crate::metrics;
use crate::ports::outbound::{DocumentStore, TimeSource};

impl<S, T> ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    fn load<D: serde::de::DeserializeOwned>(&self, path: &DocumentPath) -> RegistryResult<Option<D>> {
        self.store
            .get(path)?
            .map(|value| decode(path, value))
            .transpose()
    }

    fn load_collection<D: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> RegistryResult<Vec<D>> {
        self.store
            .list(collection)?
            .into_iter()
            .map(|(id, value)| decode(&DocumentPath::new(collection, id), value))
            .collect()
    }

    pub(crate) fn query_client(&self, client_id: &ClientId) -> RegistryResult<Client> {
        let _span = debug_span!("get_client", client_id = %client_id).entered();
        let _timer = metrics::start_operation_timer("get_client");

        let result = self
            .load(&client_path(client_id))
            .and_then(|client: Option<Client>| {
                client.ok_or_else(|| RegistryError::NotFound {
                    client_id: client_id.clone(),
                })
            });
        self.observe("get_client", result)
    }

    pub(crate) fn query_by_legal_id(&self, legal_id: &str) -> RegistryResult<Option<Client>> {
        let _span = debug_span!("find_by_legal_id").entered();
        let _timer = metrics::start_operation_timer("find_by_legal_id");

        let result = self.find_through_index(legal_id);
        self.observe("find_by_legal_id", result)
    }

    fn find_through_index(&self, legal_id: &str) -> RegistryResult<Option<Client>> {
        let normalized = normalize_legal_id(legal_id);
        if normalized.is_empty() {
            return Err(RegistryError::invalid(
                "legal_id",
                "must contain at least one letter or digit",
            ));
        }
        let Some(entry) = self.load::<LegalIdIndexEntry>(&legal_index_path(&normalized))? else {
            return Ok(None);
        };
        // A delete may land between the two reads.
        self.load(&client_path(&entry.client_id))
    }

    pub(crate) fn query_clients(&self, filter: &ClientFilter) -> RegistryResult<Vec<Client>> {
        let _span = debug_span!("list_clients", active = ?filter.active).entered();
        let _timer = metrics::start_operation_timer("list_clients");

        let prefix = filter
            .name_prefix
            .as_deref()
            .map(normalize_name)
            .filter(|p| !p.is_empty());

        let result = self.load_collection::<Client>(Collection::Clients).map(|clients| {
            let mut matching: Vec<Client> = clients
                .into_iter()
                .filter(|c| filter.active.map_or(true, |active| c.active == active))
                .filter(|c| {
                    prefix
                        .as_deref()
                        .map_or(true, |p| c.normalized_name.starts_with(p))
                })
                .collect();
            matching.sort_by(|a, b| {
                a.normalized_name
                    .cmp(&b.normalized_name)
                    .then_with(|| a.client_id.cmp(&b.client_id))
            });
            matching
        });
        self.observe("list_clients", result)
    }

    pub(crate) fn query_audit_trail(&self, client_id: &ClientId) -> RegistryResult<Vec<AuditEntry>> {
        let _span = debug_span!("audit_trail", client_id = %client_id).entered();
        let _timer = metrics::start_operation_timer("audit_trail");

        let result = self
            .load_collection::<AuditEntry>(Collection::ClientAudit)
            .map(|entries| {
                let mut trail: Vec<AuditEntry> = entries
                    .into_iter()
                    .filter(|e| e.client_id == *client_id)
                    .collect();
                trail.sort_by(|a, b| {
                    a.revision
                        .cmp(&b.revision)
                        .then_with(|| a.timestamp.cmp(&b.timestamp))
                });
                trail
            });
        self.observe("audit_trail", result)
    }
}
