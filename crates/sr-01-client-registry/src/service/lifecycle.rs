//! # Activation and Deletion
//!
//! State changes that carry a reason into the audit trail.

use shared_types::{ClientId, UserId};
use stockroom_telemetry::{log_client_event, subsystem_span};

use super::codec::{read_doc, write_doc};
use super::{ClientRegistryService, SUBSYSTEM};
use crate::domain::entities::{
    client_path, legal_index_path, AuditAction, AuditEntry, Client, LegalIdIndexEntry,
};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::normalize::non_blank;
use crate::domain::validation::validate_reason;
use crate::metrics;
use crate::ports::outbound::{DocumentStore, TimeSource};

impl<S, T> ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    pub(crate) fn execute_set_active(
        &self,
        client_id: &ClientId,
        active: bool,
        reason: &str,
        acting_user: &UserId,
    ) -> RegistryResult<Client> {
        let _span = subsystem_span!(
            "set_active_state",
            SUBSYSTEM,
            client_id = %client_id,
            active,
            acting_user = %acting_user
        )
        .entered();
        let _timer = metrics::start_operation_timer("set_active_state");

        let result = self.set_active_in_transaction(client_id, active, reason, acting_user);
        if let Ok(client) = &result {
            log_client_event!(
                info,
                SUBSYSTEM,
                "Client active state changed",
                client_id,
                acting_user,
                action = AuditAction::for_active_state(client.active).as_str()
            );
        }
        self.observe("set_active_state", result)
    }

    fn set_active_in_transaction(
        &self,
        client_id: &ClientId,
        active: bool,
        reason: &str,
        acting_user: &UserId,
    ) -> RegistryResult<Client> {
        let reason = validate_reason(reason)?;
        let path = client_path(client_id);

        self.store.run_transaction(|txn| {
            let current: Client =
                read_doc(txn, &path)?.ok_or_else(|| RegistryError::NotFound {
                    client_id: client_id.clone(),
                })?;
            if current.active == active {
                return Err(RegistryError::NoOp {
                    client_id: client_id.clone(),
                    detail: format!(
                        "client is already {}",
                        if active { "active" } else { "inactive" }
                    ),
                });
            }

            let now = self.time_source.now();
            let mut updated = current.clone();
            updated.active = active;
            updated.touch(acting_user, now);
            write_doc(txn, path.clone(), &updated)?;

            let audit = AuditEntry::new(
                AuditAction::for_active_state(active),
                client_id.clone(),
                updated.revision,
                acting_user,
                now,
            )
            .with_before(current)
            .with_after(updated.clone())
            .with_reason(reason.clone());
            write_doc(txn, audit.path(), &audit)?;

            Ok(updated)
        })
    }

    pub(crate) fn execute_delete(
        &self,
        client_id: &ClientId,
        reason: &str,
        acting_user: &UserId,
    ) -> RegistryResult<()> {
        let _span = subsystem_span!(
            "delete_client",
            SUBSYSTEM,
            client_id = %client_id,
            acting_user = %acting_user
        )
        .entered();
        let _timer = metrics::start_operation_timer("delete_client");

        let result = self.delete_in_transaction(client_id, reason, acting_user);
        if result.is_ok() {
            log_client_event!(
                info,
                SUBSYSTEM,
                "Client deleted",
                client_id,
                acting_user,
                action = AuditAction::Deleted.as_str()
            );
        }
        self.observe("delete_client", result)
    }

    fn delete_in_transaction(
        &self,
        client_id: &ClientId,
        reason: &str,
        acting_user: &UserId,
    ) -> RegistryResult<()> {
        let reason = if self.config.require_delete_reason {
            Some(validate_reason(reason)?)
        } else {
            non_blank(Some(reason))
        };
        let path = client_path(client_id);

        self.store.run_transaction(|txn| {
            let current: Client =
                read_doc(txn, &path)?.ok_or_else(|| RegistryError::NotFound {
                    client_id: client_id.clone(),
                })?;
            let index_path = legal_index_path(&current.legal_id_normalized);
            let index_entry: Option<LegalIdIndexEntry> = read_doc(txn, &index_path)?;

            txn.delete(path.clone())?;
            // The entry may already belong to someone else after a legal-ID move.
            if index_entry.is_some_and(|entry| entry.client_id == *client_id) {
                txn.delete(index_path)?;
            }

            let mut audit = AuditEntry::new(
                AuditAction::Deleted,
                client_id.clone(),
                current.revision + 1,
                acting_user,
                self.time_source.now(),
            )
            .with_before(current);
            audit.reason = reason.clone();
            write_doc(txn, audit.path(), &audit)?;

            Ok(())
        })
    }
}
