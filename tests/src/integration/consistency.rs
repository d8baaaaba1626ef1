//! # Cross-Document Consistency
//!
//! Drives the registry through seeded random histories and then checks that
//! the clients, the legal-ID index, the sequence counter and the audit trail
//! still agree with each other.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::Value;
    use shared_types::{ClientId, Collection, UserId};
    use sr_01_client_registry::domain::entities::counter_path;
    use sr_01_client_registry::{
        AuditAction, AuditEntry, Client, ClientInput, ClientPatch, ClientRegistryApi,
        ClientRegistryService, DocumentStore, FieldPatch, FixedTimeSource, InMemoryDocumentStore,
        RegistryConfig, RegistryError,
    };

    type Registry = ClientRegistryService<InMemoryDocumentStore, FixedTimeSource>;

    fn registry() -> Registry {
        ClientRegistryService::new(
            InMemoryDocumentStore::new(),
            FixedTimeSource::epoch(),
            RegistryConfig::default(),
        )
    }

    fn user() -> UserId {
        UserId::new("auditor").unwrap()
    }

    /// Apply `steps` random operations. Rejections are expected and ignored;
    /// only non-recoverable errors fail the test.
    async fn random_history(registry: &Registry, seed: u64, steps: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut issued: u64 = 0;

        for _ in 0..steps {
            // Small legal-ID pool so duplicates and index moves happen often.
            let legal_id = format!("L-{}", rng.gen_range(0..12));
            let target = ClientId::from_sequence(rng.gen_range(1..=issued.max(1))).unwrap();

            let result = match rng.gen_range(0..6) {
                0 | 1 => {
                    let input = ClientInput::new(format!("Name {}", rng.gen::<u16>()), legal_id);
                    registry.create_client(input, user()).await.map(|id| {
                        issued = issued.max(id.sequence());
                    })
                }
                2 => {
                    let patch = ClientPatch {
                        legal_id: Some(legal_id),
                        phone: if rng.gen_bool(0.5) {
                            FieldPatch::Set("8095550101".into())
                        } else {
                            FieldPatch::Clear
                        },
                        ..ClientPatch::default()
                    };
                    registry.update_client(target, patch, user()).await.map(drop)
                }
                3 => registry
                    .set_active_state(target, rng.gen_bool(0.5), "Review".into(), user())
                    .await
                    .map(drop),
                4 => registry
                    .delete_client(target, "Cleanup".into(), user())
                    .await,
                _ => registry.get_client(target).await.map(drop),
            };

            if let Err(err) = result {
                assert!(err.is_recoverable(), "unexpected failure: {err}");
            }
        }
    }

    fn clients(registry: &Registry) -> Vec<Client> {
        registry
            .store()
            .list(Collection::Clients)
            .unwrap()
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).unwrap())
            .collect()
    }

    fn audit_entries(registry: &Registry) -> Vec<AuditEntry> {
        registry
            .store()
            .list(Collection::ClientAudit)
            .unwrap()
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).unwrap())
            .collect()
    }

    fn assert_consistent(registry: &Registry) {
        let clients = clients(registry);

        // Index holds exactly one entry per live client, pointing back at it.
        let index: BTreeMap<String, Value> = registry
            .store()
            .list(Collection::LegalIdIndex)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(index.len(), clients.len());
        for client in &clients {
            let entry = index
                .get(&client.legal_id_normalized)
                .unwrap_or_else(|| panic!("no index entry for {}", client.client_id));
            assert_eq!(entry["clientId"], client.client_id.as_str());
        }

        // Counter is at or above every ID ever issued.
        let counter = registry
            .store()
            .get(&counter_path(&registry.config().counter_name))
            .unwrap();
        let last_number = counter
            .as_ref()
            .and_then(|value| value["lastNumber"].as_u64())
            .unwrap_or(0);

        let entries = audit_entries(registry);
        let created: BTreeSet<u64> = entries
            .iter()
            .filter(|entry| entry.action == AuditAction::Created)
            .map(|entry| entry.client_id.sequence())
            .collect();
        let expected: BTreeSet<u64> = (1..=last_number).collect();
        assert_eq!(created, expected, "every issued ID has exactly one create");

        // Each live client has one audit entry per revision, in order.
        for client in &clients {
            let mut revisions: Vec<u64> = entries
                .iter()
                .filter(|entry| entry.client_id == client.client_id)
                .map(|entry| entry.revision)
                .collect();
            revisions.sort_unstable();
            let expected: Vec<u64> = (1..=client.revision).collect();
            assert_eq!(revisions, expected, "audit gap for {}", client.client_id);

            let last = entries
                .iter()
                .filter(|entry| entry.client_id == client.client_id)
                .max_by_key(|entry| entry.revision)
                .unwrap();
            assert_eq!(last.after.as_ref(), Some(client));
        }

        // Deleted clients end with a delete entry and are gone.
        let live: BTreeSet<&ClientId> = clients.iter().map(|client| &client.client_id).collect();
        for entry in entries.iter().filter(|e| e.action == AuditAction::Deleted) {
            assert!(!live.contains(&entry.client_id));
            assert!(entry.after.is_none());
            assert!(entry.before.is_some());
        }
    }

    #[tokio::test]
    async fn test_random_histories_keep_documents_consistent() {
        for seed in 0..16 {
            let registry = registry();
            random_history(&registry, seed, 120).await;
            assert_consistent(&registry);
        }
    }

    #[tokio::test]
    async fn test_failed_commits_leave_no_trace() {
        let registry = registry();
        random_history(&registry, 42, 40).await;
        let before = registry.store().snapshot_json().unwrap();

        let count = clients(&registry).len();
        registry.store().inject_commit_failures(1);
        let err = registry
            .create_client(ClientInput::new("Doomed", "NEW-LEGAL"), user())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Transaction { .. }));
        assert!(err.is_transient());

        assert_eq!(registry.store().snapshot_json().unwrap(), before);
        assert_eq!(clients(&registry).len(), count);
        assert_consistent(&registry);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_never_reissued() {
        let registry = registry();
        let first = registry
            .create_client(ClientInput::new("First", "1"), user())
            .await
            .unwrap();
        registry
            .delete_client(first.clone(), "Duplicate entry".into(), user())
            .await
            .unwrap();

        let second = registry
            .create_client(ClientInput::new("Second", "1"), user())
            .await
            .unwrap();
        assert_eq!(second.as_str(), "000002");
        assert!(matches!(
            registry.get_client(first).await,
            Err(RegistryError::NotFound { .. })
        ));
        assert_consistent(&registry);
    }
}
