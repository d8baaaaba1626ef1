//! # Store Container
//!
//! Picks the document store backend at startup. The registry service is
//! generic over its store; `RegistryStore` lets the binary choose one at
//! runtime without boxing the transaction body.

use serde_json::Value;
use shared_types::{Collection, DocumentPath};
use sr_01_client_registry::{
    ClientRegistryService, DocumentStore, DocumentTransaction, FileBackedDocumentStore,
    InMemoryDocumentStore, RegistryConfig, StoreConfig, StoreError, SystemTimeSource,
};
#[cfg(feature = "rocksdb")]
use sr_01_client_registry::{RocksDbConfig, RocksDbDocumentStore};
use tracing::info;

use crate::cli::Backend;
#[cfg(not(feature = "rocksdb"))]
use crate::config::ConfigError;

/// The registry service as wired by the runtime.
pub type RuntimeRegistry = ClientRegistryService<RegistryStore, SystemTimeSource>;

/// Document store selected by configuration.
pub enum RegistryStore {
    File(FileBackedDocumentStore),
    Memory(InMemoryDocumentStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbDocumentStore),
}

impl RegistryStore {
    /// Open the configured backend.
    pub fn open(backend: Backend, config: &StoreConfig) -> anyhow::Result<Self> {
        let store = match backend {
            Backend::File => RegistryStore::File(FileBackedDocumentStore::open(config)?),
            Backend::Memory => {
                RegistryStore::Memory(InMemoryDocumentStore::with_config(config.clone()))
            }
            #[cfg(feature = "rocksdb")]
            Backend::Rocksdb => RegistryStore::RocksDb(RocksDbDocumentStore::open(
                &RocksDbConfig {
                    path: config.data_file.clone(),
                    ..RocksDbConfig::default()
                },
                config,
            )?),
            #[cfg(not(feature = "rocksdb"))]
            Backend::Rocksdb => return Err(ConfigError::RocksDbUnavailable.into()),
        };
        info!(backend = ?backend, path = %config.data_file.display(), "Document store ready");
        Ok(store)
    }

    pub fn backend(&self) -> Backend {
        match self {
            RegistryStore::File(_) => Backend::File,
            RegistryStore::Memory(_) => Backend::Memory,
            #[cfg(feature = "rocksdb")]
            RegistryStore::RocksDb(_) => Backend::Rocksdb,
        }
    }
}

impl DocumentStore for RegistryStore {
    fn get(&self, path: &DocumentPath) -> Result<Option<Value>, StoreError> {
        match self {
            RegistryStore::File(store) => store.get(path),
            RegistryStore::Memory(store) => store.get(path),
            #[cfg(feature = "rocksdb")]
            RegistryStore::RocksDb(store) => store.get(path),
        }
    }

    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError> {
        match self {
            RegistryStore::File(store) => store.list(collection),
            RegistryStore::Memory(store) => store.list(collection),
            #[cfg(feature = "rocksdb")]
            RegistryStore::RocksDb(store) => store.list(collection),
        }
    }

    fn run_transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnMut(&mut dyn DocumentTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        match self {
            RegistryStore::File(store) => store.run_transaction(body),
            RegistryStore::Memory(store) => store.run_transaction(body),
            #[cfg(feature = "rocksdb")]
            RegistryStore::RocksDb(store) => store.run_transaction(body),
        }
    }
}

/// Build the registry service over the configured backend.
pub fn build_registry(
    backend: Backend,
    store_config: &StoreConfig,
    registry_config: RegistryConfig,
) -> anyhow::Result<RuntimeRegistry> {
    let store = RegistryStore::open(backend, store_config)?;
    Ok(ClientRegistryService::new(
        store,
        SystemTimeSource,
        registry_config,
    ))
}
