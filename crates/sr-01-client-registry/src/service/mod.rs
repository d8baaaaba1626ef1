//! # Client Registry Service
//!
//! The main service implementing `ClientRegistryApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Validates input before touching the store
//! 2. Runs every mutation as one `DocumentStore::run_transaction` body that
//!    performs all of its reads before any write and can be re-run safely
//! 3. Holds no caches and no locks; concurrency control belongs to the store

mod codec;
mod create;
mod lifecycle;
mod queries;
mod update;

use async_trait::async_trait;
use shared_types::{ClientId, UserId};
use stockroom_telemetry::log_event;

use crate::adapters::{InMemoryDocumentStore, SystemTimeSource};
use crate::domain::entities::{AuditEntry, Client};
use crate::domain::errors::RegistryResult;
use crate::domain::validation::{ClientInput, ClientPatch};
use crate::domain::value_objects::{ClientFilter, RegistryConfig, StoreConfig};
use crate::metrics;
use crate::ports::inbound::ClientRegistryApi;
use crate::ports::outbound::{DocumentStore, TimeSource};

/// Subsystem label attached to every log event.
pub const SUBSYSTEM: &str = "client-registry";

/// The Client Registry Service.
pub struct ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    pub(crate) store: S,
    pub(crate) time_source: T,
    pub(crate) config: RegistryConfig,
}

impl<S, T> ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    pub fn new(store: S, time_source: T, config: RegistryConfig) -> Self {
        Self {
            store,
            time_source,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Record the outcome of an operation and pass the result through.
    fn observe<R>(&self, operation: &'static str, result: RegistryResult<R>) -> RegistryResult<R> {
        match &result {
            Ok(_) => metrics::record_operation(operation, "ok"),
            Err(err) => {
                metrics::record_operation(operation, err.kind());
                if err.is_recoverable() {
                    log_event!(info, SUBSYSTEM, "Operation rejected", operation = operation, error = %err);
                } else {
                    log_event!(error, SUBSYSTEM, "Operation failed", operation = operation, error = %err);
                }
            }
        }
        result
    }
}

impl ClientRegistryService<InMemoryDocumentStore, SystemTimeSource> {
    /// Service over a fresh in-memory store.
    pub fn new_in_memory(config: RegistryConfig, store_config: StoreConfig) -> Self {
        Self::new(
            InMemoryDocumentStore::with_config(store_config),
            SystemTimeSource,
            config,
        )
    }
}

#[async_trait]
impl<S, T> ClientRegistryApi for ClientRegistryService<S, T>
where
    S: DocumentStore + 'static,
    T: TimeSource + 'static,
{
    async fn create_client(
        &self,
        input: ClientInput,
        acting_user: UserId,
    ) -> RegistryResult<ClientId> {
        self.execute_create(&input, &acting_user)
    }

    async fn update_client(
        &self,
        client_id: ClientId,
        patch: ClientPatch,
        acting_user: UserId,
    ) -> RegistryResult<Client> {
        self.execute_update(&client_id, &patch, &acting_user)
    }

    async fn set_active_state(
        &self,
        client_id: ClientId,
        active: bool,
        reason: String,
        acting_user: UserId,
    ) -> RegistryResult<Client> {
        self.execute_set_active(&client_id, active, &reason, &acting_user)
    }

    async fn delete_client(
        &self,
        client_id: ClientId,
        reason: String,
        acting_user: UserId,
    ) -> RegistryResult<()> {
        self.execute_delete(&client_id, &reason, &acting_user)
    }

    async fn get_client(&self, client_id: ClientId) -> RegistryResult<Client> {
        self.query_client(&client_id)
    }

    async fn find_by_legal_id(&self, legal_id: String) -> RegistryResult<Option<Client>> {
        self.query_by_legal_id(&legal_id)
    }

    async fn list_clients(&self, filter: ClientFilter) -> RegistryResult<Vec<Client>> {
        self.query_clients(&filter)
    }

    async fn audit_trail(&self, client_id: ClientId) -> RegistryResult<Vec<AuditEntry>> {
        self.query_audit_trail(&client_id)
    }
}
