//! # Persistence Through the File Backend
//!
//! Registry state written by one process must be visible, unchanged, to the
//! next one. Exercised both through the service directly and through the
//! runtime wiring the `stockroom-registry` binary uses.

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use registry_runtime::{build_registry, execute, Backend, Cli, Command, DataLock, LockError};
    use serde_json::json;
    use shared_types::UserId;
    use sr_01_client_registry::{
        AuditAction, ClientFilter, ClientInput, ClientPatch, ClientRegistryApi,
        ClientRegistryService, FieldPatch, FileBackedDocumentStore, RegistryConfig, StoreConfig,
        SystemTimeSource,
    };
    use tempfile::TempDir;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn store_config(dir: &TempDir) -> StoreConfig {
        StoreConfig {
            data_file: dir.path().join("registry.json"),
            ..StoreConfig::default()
        }
    }

    fn open(
        config: &StoreConfig,
    ) -> ClientRegistryService<FileBackedDocumentStore, SystemTimeSource> {
        ClientRegistryService::new(
            FileBackedDocumentStore::open(config).unwrap(),
            SystemTimeSource,
            RegistryConfig::default(),
        )
    }

    fn admin() -> UserId {
        UserId::new("admin").unwrap()
    }

    /// Parses argv the way the binary does.
    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["stockroom-registry"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).command
    }

    // =============================================================================
    // SERVICE OVER FILE STORE
    // =============================================================================

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = store_config(&dir);

        {
            let registry = open(&config);
            let id = registry
                .create_client(
                    ClientInput::new("Ferretería Central", "123-45-678")
                        .with_email("Ventas@Ferreteria.com"),
                    admin(),
                )
                .await
                .unwrap();
            let patch = ClientPatch {
                email: FieldPatch::Clear,
                ..ClientPatch::default()
            };
            registry.update_client(id.clone(), patch, admin()).await.unwrap();
            registry
                .set_active_state(id, false, "Closed for renovation".into(), admin())
                .await
                .unwrap();
        }

        let reopened = open(&config);
        let client = reopened
            .find_by_legal_id("12345678".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(client.revision, 3);
        assert!(!client.active);
        assert_eq!(client.email, None);

        let actions: Vec<AuditAction> = reopened
            .audit_trail(client.client_id.clone())
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.action)
            .collect();
        assert_eq!(
            actions,
            vec![AuditAction::Created, AuditAction::Updated, AuditAction::Deactivated]
        );

        // Numbering continues after the reopen.
        let next = reopened
            .create_client(ClientInput::new("Otra", "9"), admin())
            .await
            .unwrap();
        assert_eq!(next.as_str(), "000002");
    }

    #[tokio::test]
    async fn test_failed_persist_is_not_visible_after_reopen() {
        let dir = TempDir::new().unwrap();
        let config = store_config(&dir);

        let registry = open(&config);
        registry
            .create_client(ClientInput::new("Kept", "1"), admin())
            .await
            .unwrap();
        registry.store().inject_commit_failures(1);
        assert!(registry
            .create_client(ClientInput::new("Lost", "2"), admin())
            .await
            .is_err());
        drop(registry);

        let reopened = open(&config);
        let listed = reopened.list_clients(ClientFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "Kept");
    }

    #[test]
    fn test_corrupt_snapshot_refuses_to_open() {
        let dir = TempDir::new().unwrap();
        let config = store_config(&dir);
        fs::write(&config.data_file, b"{ not json").unwrap();

        assert!(FileBackedDocumentStore::open(&config).is_err());
    }

    // =============================================================================
    // RUNTIME WIRING
    // =============================================================================

    #[tokio::test]
    async fn test_runtime_commands_across_invocations() {
        let dir = TempDir::new().unwrap();
        let config = store_config(&dir);

        let first = build_registry(Backend::File, &config, RegistryConfig::default()).unwrap();
        let created = execute(
            &first,
            command(&["create", "--name", "Acme", "--legal-id", "A-1", "--phone", "809 555 0101"]),
            Some("clerk"),
        )
        .await
        .unwrap();
        assert_eq!(created, json!({ "clientId": "000001" }));
        drop(first);

        let second = build_registry(Backend::File, &config, RegistryConfig::default()).unwrap();
        let shown = execute(&second, command(&["show", "000001"]), None)
            .await
            .unwrap();
        assert_eq!(shown["phone"], "8095550101");
        assert_eq!(shown["createdBy"], "clerk");

        let err = execute(
            &second,
            command(&["create", "--name", "Copy", "--legal-id", "a1"]),
            Some("clerk"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_json()["error"], "duplicate_legal_id");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_data_lock_excludes_second_writer() {
        let dir = TempDir::new().unwrap();
        let config = store_config(&dir);

        let held = DataLock::acquire(&config.data_file).unwrap();
        assert!(matches!(
            DataLock::acquire(&config.data_file),
            Err(LockError::AlreadyLocked { .. })
        ));
        drop(held);
        assert!(DataLock::acquire(&config.data_file).is_ok());
    }

    #[test]
    fn test_cli_parses_backend_flag() {
        let cli = Cli::parse_from([
            "stockroom-registry",
            "--backend",
            "memory",
            "list",
            "--active",
        ]);
        assert_eq!(cli.backend, Some(Backend::Memory));
        assert!(!cli.command.is_mutation());
    }
}
