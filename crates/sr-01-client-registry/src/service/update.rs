//! # Client Update
//!
//! Merges a `ClientPatch` into the stored client. When the normalized legal
//! ID changes the index entry moves with it: the new key is claimed and the
//! old one released in the same transaction.

use shared_types::{ClientId, UserId};
use stockroom_telemetry::{log_client_event, subsystem_span};

use super::codec::{read_doc, write_doc};
use super::{ClientRegistryService, SUBSYSTEM};
use crate::domain::entities::{
    client_path, legal_index_path, AuditAction, AuditEntry, Client, LegalIdIndexEntry,
};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::validation::{validate_patch, ClientPatch};
use crate::metrics;
use crate::ports::outbound::{DocumentStore, TimeSource};

impl<S, T> ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    pub(crate) fn execute_update(
        &self,
        client_id: &ClientId,
        patch: &ClientPatch,
        acting_user: &UserId,
    ) -> RegistryResult<Client> {
        let _span = subsystem_span!(
            "update_client",
            SUBSYSTEM,
            client_id = %client_id,
            acting_user = %acting_user
        )
        .entered();
        let _timer = metrics::start_operation_timer("update_client");

        let result = self.update_in_transaction(client_id, patch, acting_user);
        if let Ok(client) = &result {
            log_client_event!(
                info,
                SUBSYSTEM,
                "Client updated",
                client_id,
                acting_user,
                action = AuditAction::Updated.as_str(),
                revision = client.revision
            );
        }
        self.observe("update_client", result)
    }

    fn update_in_transaction(
        &self,
        client_id: &ClientId,
        patch: &ClientPatch,
        acting_user: &UserId,
    ) -> RegistryResult<Client> {
        let validated = validate_patch(patch, &self.config)?;
        let path = client_path(client_id);

        self.store.run_transaction(|txn| {
            let current: Client =
                read_doc(txn, &path)?.ok_or_else(|| RegistryError::NotFound {
                    client_id: client_id.clone(),
                })?;

            let mut updated = validated.merge(&current);
            if updated.same_content(&current) {
                return Err(RegistryError::NoOp {
                    client_id: client_id.clone(),
                    detail: "patch does not change any field".to_string(),
                });
            }

            // Index move: every read happens before the first write.
            let index_move = if updated.legal_id_normalized != current.legal_id_normalized {
                let new_index = legal_index_path(&updated.legal_id_normalized);
                let old_index = legal_index_path(&current.legal_id_normalized);

                if let Some(entry) = read_doc::<LegalIdIndexEntry>(txn, &new_index)? {
                    if entry.client_id != *client_id {
                        return Err(RegistryError::DuplicateLegalId {
                            legal_id: updated.legal_id_normalized.clone(),
                            owner: entry.client_id,
                        });
                    }
                }
                let old_entry: Option<LegalIdIndexEntry> = read_doc(txn, &old_index)?;
                let release_old = old_entry.is_some_and(|entry| entry.client_id == *client_id);
                Some((new_index, old_index, release_old))
            } else {
                None
            };

            let now = self.time_source.now();
            updated.touch(acting_user, now);

            if let Some((new_index, old_index, release_old)) = index_move {
                write_doc(
                    txn,
                    new_index,
                    &LegalIdIndexEntry {
                        client_id: client_id.clone(),
                    },
                )?;
                if release_old {
                    txn.delete(old_index)?;
                }
            }
            write_doc(txn, path.clone(), &updated)?;

            let audit = AuditEntry::new(
                AuditAction::Updated,
                client_id.clone(),
                updated.revision,
                acting_user,
                now,
            )
            .with_before(current)
            .with_after(updated.clone());
            write_doc(txn, audit.path(), &audit)?;

            Ok(updated)
        })
    }
}
