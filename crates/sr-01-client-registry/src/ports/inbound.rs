//! # Inbound Ports (Driving Ports)
//!
//! The API administrative screens and the operator CLI call.

use async_trait::async_trait;
use shared_types::{ClientId, UserId};

use crate::domain::entities::{AuditEntry, Client};
use crate::domain::errors::RegistryResult;
use crate::domain::validation::{ClientInput, ClientPatch};
use crate::domain::value_objects::ClientFilter;

/// Primary API of the Client Registry subsystem.
///
/// Every mutation is one atomic transaction: it either commits completely
/// or leaves the store untouched.
#[async_trait]
pub trait ClientRegistryApi: Send + Sync {
    /// Register a new client and allocate the next sequential ID.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: a field failed validation (no store access)
    /// - `DuplicateLegalId`: the normalized legal ID is already registered
    /// - `SequenceExhausted`: all six-digit IDs are in use
    /// - `Transaction`: store failure or retry budget exhausted
    async fn create_client(&self, input: ClientInput, acting_user: UserId)
        -> RegistryResult<ClientId>;

    /// Apply a partial edit. Moves the legal-ID index entry when the
    /// normalized legal ID changes.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`, `NotFound`, `DuplicateLegalId`, `Transaction`
    /// - `NoOp`: the patch would not change the stored client
    async fn update_client(
        &self,
        client_id: ClientId,
        patch: ClientPatch,
        acting_user: UserId,
    ) -> RegistryResult<Client>;

    /// Activate or deactivate a client. `reason` must be non-blank.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: blank reason, checked before any read
    /// - `NotFound`, `Transaction`
    /// - `NoOp`: the client is already in the requested state
    async fn set_active_state(
        &self,
        client_id: ClientId,
        active: bool,
        reason: String,
        acting_user: UserId,
    ) -> RegistryResult<Client>;

    /// Delete a client and release its legal ID. The client ID is never
    /// reissued.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: blank reason when reasons are required
    /// - `NotFound`: nothing is written, not even an audit entry
    /// - `Transaction`
    async fn delete_client(
        &self,
        client_id: ClientId,
        reason: String,
        acting_user: UserId,
    ) -> RegistryResult<()>;

    async fn get_client(&self, client_id: ClientId) -> RegistryResult<Client>;

    /// Resolve a raw legal ID (any formatting) through the uniqueness index.
    async fn find_by_legal_id(&self, legal_id: String) -> RegistryResult<Option<Client>>;

    /// Clients matching `filter`, ordered by normalized name then client ID.
    async fn list_clients(&self, filter: ClientFilter) -> RegistryResult<Vec<Client>>;

    /// Audit entries of a client, oldest first. Works for deleted clients.
    async fn audit_trail(&self, client_id: ClientId) -> RegistryResult<Vec<AuditEntry>>;
}
