//! # Client Creation
//!
//! Allocates the next sequential client ID and claims the legal-ID index
//! entry in the same transaction. Two creators racing for the same legal ID
//! both read the index entry, so whichever commits second is re-run, sees
//! the entry and fails with `DuplicateLegalId`.

use shared_types::{ClientId, UserId};
use stockroom_telemetry::{log_client_event, subsystem_span};

use super::codec::{read_doc, write_doc};
use super::{ClientRegistryService, SUBSYSTEM};
use crate::domain::entities::{
    counter_path, legal_index_path, AuditAction, AuditEntry, LegalIdIndexEntry, SequenceCounter,
};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::validation::{validate_input, ClientInput};
use crate::metrics;
use crate::ports::outbound::{DocumentStore, TimeSource};

impl<S, T> ClientRegistryService<S, T>
where
    S: DocumentStore,
    T: TimeSource,
{
    pub(crate) fn execute_create(
        &self,
        input: &ClientInput,
        acting_user: &UserId,
    ) -> RegistryResult<ClientId> {
        let _span =
            subsystem_span!("create_client", SUBSYSTEM, acting_user = %acting_user).entered();
        let _timer = metrics::start_operation_timer("create_client");

        let result = self.create_in_transaction(input, acting_user);
        if let Ok(client_id) = &result {
            metrics::record_client_created();
            log_client_event!(
                info,
                SUBSYSTEM,
                "Client created",
                client_id,
                acting_user,
                action = AuditAction::Created.as_str()
            );
        }
        self.observe("create_client", result)
    }

    fn create_in_transaction(
        &self,
        input: &ClientInput,
        acting_user: &UserId,
    ) -> RegistryResult<ClientId> {
        let validated = validate_input(input, &self.config)?;
        let counter_path = counter_path(&self.config.counter_name);
        let index_path = legal_index_path(&validated.legal_id_normalized);

        self.store.run_transaction(|txn| {
            let counter: SequenceCounter = read_doc(txn, &counter_path)?.unwrap_or_default();
            let client_id = ClientId::from_sequence(counter.last_number.saturating_add(1))
                .map_err(|_| RegistryError::SequenceExhausted {
                    last_number: counter.last_number,
                })?;

            if let Some(entry) = read_doc::<LegalIdIndexEntry>(txn, &index_path)? {
                return Err(RegistryError::DuplicateLegalId {
                    legal_id: validated.legal_id_normalized.clone(),
                    owner: entry.client_id,
                });
            }

            let now = self.time_source.now();
            let client = validated
                .clone()
                .into_client(client_id.clone(), acting_user, now);
            let audit = AuditEntry::new(
                AuditAction::Created,
                client_id.clone(),
                client.revision,
                acting_user,
                now,
            )
            .with_after(client.clone());

            write_doc(
                txn,
                counter_path.clone(),
                &SequenceCounter {
                    last_number: client_id.sequence(),
                },
            )?;
            write_doc(txn, client.path(), &client)?;
            write_doc(
                txn,
                index_path.clone(),
                &LegalIdIndexEntry {
                    client_id: client_id.clone(),
                },
            )?;
            write_doc(txn, audit.path(), &audit)?;

            Ok(client_id)
        })
    }
}
