//! # Concurrent Writers
//!
//! Many tasks race on a multi-thread runtime against one registry. The
//! optimistic store must serialize them: every create gets a distinct
//! sequential ID, and a contested legal ID has exactly one owner.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use shared_types::{ClientId, UserId};
    use sr_01_client_registry::{
        ClientFilter, ClientInput, ClientPatch, ClientRegistryApi, ClientRegistryService,
        InMemoryDocumentStore, RegistryConfig, RegistryError, StoreConfig, SystemTimeSource,
    };

    type Registry = ClientRegistryService<InMemoryDocumentStore, SystemTimeSource>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Retry budget large enough that contention never exhausts it.
    fn contended_registry() -> Arc<Registry> {
        Arc::new(ClientRegistryService::new_in_memory(
            RegistryConfig::default(),
            StoreConfig::with_max_attempts(1_000),
        ))
    }

    fn clerk(n: usize) -> UserId {
        UserId::new(format!("clerk-{n}")).unwrap()
    }

    // =============================================================================
    // ID ALLOCATION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_creates_receive_gapless_ids() {
        const WRITERS: usize = 64;
        let registry = contended_registry();

        let handles: Vec<_> = (0..WRITERS)
            .map(|n| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let input = ClientInput::new(format!("Client {n}"), format!("LEGAL-{n}"));
                    registry.create_client(input, clerk(n)).await
                })
            })
            .collect();

        let mut ids = BTreeSet::new();
        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            assert!(ids.insert(id), "client ID issued twice");
        }

        let expected: BTreeSet<ClientId> = (1..=WRITERS as u64)
            .map(|n| ClientId::from_sequence(n).unwrap())
            .collect();
        assert_eq!(ids, expected);

        let listed = registry.list_clients(ClientFilter::default()).await.unwrap();
        assert_eq!(listed.len(), WRITERS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_contested_legal_id_has_one_owner() {
        const WRITERS: usize = 24;
        let registry = contended_registry();

        // Same legal ID in different formatting.
        let handles: Vec<_> = (0..WRITERS)
            .map(|n| {
                let registry = Arc::clone(&registry);
                let legal_id = if n % 2 == 0 { "131-22-333" } else { "131 22 333" };
                tokio::spawn(async move {
                    let input = ClientInput::new(format!("Racer {n}"), legal_id);
                    registry.create_client(input, clerk(n)).await
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(id) => winners.push(id),
                Err(RegistryError::DuplicateLegalId { legal_id, .. }) => {
                    assert_eq!(legal_id, "13122333");
                    duplicates += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(duplicates, WRITERS - 1);
        assert_eq!(winners[0].as_str(), "000001");

        // Losers consumed no sequence numbers.
        let next = registry
            .create_client(ClientInput::new("After", "999"), clerk(0))
            .await
            .unwrap();
        assert_eq!(next.as_str(), "000002");
    }

    // =============================================================================
    // UPDATES
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_updates_each_bump_revision_once() {
        const EDITORS: usize = 16;
        let registry = contended_registry();
        let id = registry
            .create_client(ClientInput::new("Shared", "555"), clerk(0))
            .await
            .unwrap();

        let handles: Vec<_> = (0..EDITORS)
            .map(|n| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                tokio::spawn(async move {
                    let patch = ClientPatch {
                        display_name: Some(format!("Shared v{n}")),
                        ..ClientPatch::default()
                    };
                    registry.update_client(id, patch, clerk(n)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let client = registry.get_client(id.clone()).await.unwrap();
        assert_eq!(client.revision, 1 + EDITORS as u64);

        let trail = registry.audit_trail(id).await.unwrap();
        let revisions: Vec<u64> = trail.iter().map(|entry| entry.revision).collect();
        let expected: Vec<u64> = (1..=1 + EDITORS as u64).collect();
        assert_eq!(revisions, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_swapping_legal_ids_never_duplicates() {
        let registry = contended_registry();
        let a = registry
            .create_client(ClientInput::new("A", "AAA-1"), clerk(0))
            .await
            .unwrap();
        let b = registry
            .create_client(ClientInput::new("B", "BBB-2"), clerk(0))
            .await
            .unwrap();

        // Both try to take the same free legal ID at once.
        let take = |id: ClientId, n: usize| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let patch = ClientPatch {
                    legal_id: Some("CCC-3".into()),
                    ..ClientPatch::default()
                };
                registry.update_client(id, patch, clerk(n)).await
            })
        };
        let first = take(a.clone(), 1);
        let second = take(b.clone(), 2);
        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let owner = registry
            .find_by_legal_id("CCC3".into())
            .await
            .unwrap()
            .unwrap();
        assert!(owner.client_id == a || owner.client_id == b);

        // The loser keeps its old legal ID and index entry.
        let loser = if owner.client_id == a { "BBB2" } else { "AAA1" };
        assert!(registry
            .find_by_legal_id(loser.into())
            .await
            .unwrap()
            .is_some());
    }
}
