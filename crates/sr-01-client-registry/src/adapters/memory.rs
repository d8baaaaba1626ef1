use parking_lot::RwLock;
use serde_json::Value;
use shared_types::{Collection, DocumentPath};

use super::versioned::{run_optimistic, FaultInjector, VersionedState};
use crate::domain::value_objects::StoreConfig;
use crate::ports::outbound::{DocumentStore, DocumentTransaction, StoreError};

/// In-memory document store for tests and ephemeral runs.
///
/// Same optimistic semantics as the durable stores. Commit failures can be
/// injected to exercise the all-or-nothing guarantee.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<VersionedState>,
    config: StoreConfig,
    faults: FaultInjector,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Force the next `count` commit attempts to see a conflict.
    pub fn inject_conflicts(&self, count: u32) {
        self.faults.add_conflicts(count);
    }

    /// Force the next `count` commits to fail after validation.
    pub fn inject_commit_failures(&self, count: u32) {
        self.faults.add_failures(count);
    }

    /// Number of committed documents across all collections.
    pub fn document_count(&self) -> usize {
        self.state.read().len()
    }

    /// Canonical JSON dump of every document and its version.
    pub fn snapshot_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(&self.state.read().to_snapshot()).map_err(StoreError::codec)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, path: &DocumentPath) -> Result<Option<Value>, StoreError> {
        Ok(self.state.read().get(path).map(|doc| doc.data.clone()))
    }

    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError> {
        Ok(self.state.read().list(collection))
    }

    fn run_transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnMut(&mut dyn DocumentTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        run_optimistic(
            &self.state,
            self.config.max_attempts,
            &self.faults,
            |_| Ok(()),
            body,
        )
    }
}
