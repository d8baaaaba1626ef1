use parking_lot::RwLock;
use serde_json::Value;
use shared_types::{Collection, DocumentPath};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::versioned::{run_optimistic, FaultInjector, Snapshot, VersionedState};
use crate::domain::value_objects::StoreConfig;
use crate::ports::outbound::{DocumentStore, DocumentTransaction, StoreError};

/// File-backed document store for single-process deployments without
/// RocksDB.
///
/// The whole store is kept in memory and rewritten as one JSON snapshot
/// after every commit, via a temp file and an atomic rename. A commit whose
/// snapshot cannot be written is rolled back in memory too.
pub struct FileBackedDocumentStore {
    state: RwLock<VersionedState>,
    path: PathBuf,
    max_attempts: u32,
    faults: FaultInjector,
}

impl FileBackedDocumentStore {
    /// Open the store at `config.data_file`, loading the existing snapshot
    /// if there is one.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.data_file.clone();
        let state = match Self::load_from_file(&path)? {
            Some(snapshot) => {
                info!(
                    path = %path.display(),
                    documents = snapshot.documents.len(),
                    "[sr-01] Loaded registry snapshot"
                );
                VersionedState::from_snapshot(snapshot)?
            }
            None => {
                info!(path = %path.display(), "[sr-01] No registry snapshot, starting empty");
                VersionedState::default()
            }
        };

        Ok(Self {
            state: RwLock::new(state),
            path,
            max_attempts: config.max_attempts,
            faults: FaultInjector::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force the next `count` commits to fail before the snapshot is written.
    pub fn inject_commit_failures(&self, count: u32) {
        self.faults.add_failures(count);
    }

    fn load_from_file(path: &Path) -> Result<Option<Snapshot>, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::backend(err)),
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(StoreError::codec)
    }

    /// Sibling temp file (`registry.json` -> `registry.json.tmp`). Never the
    /// data file itself, whatever its extension.
    fn temp_path_for(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn save_to_file(path: &Path, state: &VersionedState) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::backend)?;
        }

        let bytes = serde_json::to_vec_pretty(&state.to_snapshot()).map_err(StoreError::codec)?;

        // Write atomically via temp file
        let temp_path = Self::temp_path_for(path);
        let mut file = fs::File::create(&temp_path).map_err(StoreError::backend)?;
        file.write_all(&bytes).map_err(StoreError::backend)?;
        file.sync_all().map_err(StoreError::backend)?;
        fs::rename(&temp_path, path).map_err(StoreError::backend)?;

        Ok(())
    }
}

impl DocumentStore for FileBackedDocumentStore {
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
        let path = self.path.as_path();
        run_optimistic(
            &self.state,
            self.max_attempts,
            &self.faults,
            |state| Self::save_to_file(path, state),
            body,
        )
    }
}
