//! Versioned document map and the optimistic commit loop shared by the
//! in-process stores.
//!
//! Every committed write stamps the document with a fresh version. A
//! transaction remembers the version of every document it read (0 for
//! absent) and commits only if all of them are unchanged, which makes the
//! commit equivalent to running the whole body at the commit instant.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Collection, DocumentPath};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

use crate::metrics;
use crate::ports::outbound::{DocumentTransaction, StoreError};

/// A committed document and the version that wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredDocument {
    pub version: u64,
    pub data: Value,
}

/// Serialized form of the whole store, keyed by `collection/id`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    pub next_version: u64,
    pub documents: BTreeMap<String, StoredDocument>,
}

type UndoLog = Vec<(DocumentPath, Option<StoredDocument>)>;

#[derive(Debug, Default)]
pub(crate) struct VersionedState {
    documents: BTreeMap<DocumentPath, StoredDocument>,
    next_version: u64,
}

impl VersionedState {
    pub fn version_of(&self, path: &DocumentPath) -> u64 {
        self.documents.get(path).map_or(0, |doc| doc.version)
    }

    pub fn get(&self, path: &DocumentPath) -> Option<&StoredDocument> {
        self.documents.get(path)
    }

    pub fn list(&self, collection: Collection) -> Vec<(String, Value)> {
        self.documents
            .iter()
            .filter(|(path, _)| path.collection == collection)
            .map(|(path, doc)| (path.id.clone(), doc.data.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if every document in `reads` still has the version observed.
    fn validate(&self, reads: &HashMap<DocumentPath, u64>) -> bool {
        reads
            .iter()
            .all(|(path, version)| self.version_of(path) == *version)
    }

    /// Apply buffered writes under one new version. Returns what was
    /// overwritten so a failed persist can be undone.
    fn apply(&mut self, writes: BTreeMap<DocumentPath, Option<Value>>) -> UndoLog {
        self.next_version += 1;
        let version = self.next_version;
        let mut undo = Vec::with_capacity(writes.len());
        for (path, value) in writes {
            let previous = match value {
                Some(data) => self
                    .documents
                    .insert(path.clone(), StoredDocument { version, data }),
                None => self.documents.remove(&path),
            };
            undo.push((path, previous));
        }
        undo
    }

    fn revert(&mut self, undo: UndoLog) {
        for (path, previous) in undo.into_iter().rev() {
            match previous {
                Some(doc) => {
                    self.documents.insert(path, doc);
                }
                None => {
                    self.documents.remove(&path);
                }
            }
        }
        self.next_version -= 1;
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_version: self.next_version,
            documents: self
                .documents
                .iter()
                .map(|(path, doc)| (path.key(), doc.clone()))
                .collect(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut documents = BTreeMap::new();
        for (key, doc) in snapshot.documents {
            let path = DocumentPath::from_key(&key)
                .ok_or_else(|| StoreError::codec(format!("unknown document key {key:?}")))?;
            documents.insert(path, doc);
        }
        Ok(Self {
            documents,
            next_version: snapshot.next_version,
        })
    }
}

/// One attempt of a transaction body: tracked reads, buffered writes.
struct StagedTransaction<'a> {
    state: &'a RwLock<VersionedState>,
    reads: HashMap<DocumentPath, u64>,
    writes: BTreeMap<DocumentPath, Option<Value>>,
}

impl<'a> StagedTransaction<'a> {
    fn new(state: &'a RwLock<VersionedState>) -> Self {
        Self {
            state,
            reads: HashMap::new(),
            writes: BTreeMap::new(),
        }
    }
}

impl DocumentTransaction for StagedTransaction<'_> {
    fn get(&mut self, path: &DocumentPath) -> Result<Option<Value>, StoreError> {
        if let Some(buffered) = self.writes.get(path) {
            return Ok(buffered.clone());
        }
        let state = self.state.read();
        let (version, data) = match state.get(path) {
            Some(doc) => (doc.version, Some(doc.data.clone())),
            None => (0, None),
        };
        // First observation wins; a later re-read must not mask a change.
        self.reads.entry(path.clone()).or_insert(version);
        Ok(data)
    }

    fn set(&mut self, path: DocumentPath, value: Value) -> Result<(), StoreError> {
        self.writes.insert(path, Some(value));
        Ok(())
    }

    fn delete(&mut self, path: DocumentPath) -> Result<(), StoreError> {
        self.writes.insert(path, None);
        Ok(())
    }
}

/// Test hooks that force commits to fail.
#[derive(Debug, Default)]
pub(crate) struct FaultInjector {
    conflicts: AtomicU32,
    failures: AtomicU32,
}

impl FaultInjector {
    pub fn add_conflicts(&self, count: u32) {
        self.conflicts.fetch_add(count, Ordering::SeqCst);
    }

    pub fn add_failures(&self, count: u32) {
        self.failures.fetch_add(count, Ordering::SeqCst);
    }

    fn take(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn take_conflict(&self) -> bool {
        Self::take(&self.conflicts)
    }

    fn take_failure(&self) -> bool {
        Self::take(&self.failures)
    }
}

/// Run `body` against `state` with optimistic concurrency control.
///
/// `persist` is called under the write lock after the writes are applied;
/// if it fails the writes are rolled back and the error is returned.
pub(crate) fn run_optimistic<T, E, F, P>(
    state: &RwLock<VersionedState>,
    max_attempts: u32,
    faults: &FaultInjector,
    mut persist: P,
    mut body: F,
) -> Result<T, E>
where
    F: FnMut(&mut dyn DocumentTransaction) -> Result<T, E>,
    E: From<StoreError>,
    P: FnMut(&VersionedState) -> Result<(), StoreError>,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let mut txn = StagedTransaction::new(state);
        let value = body(&mut txn)?;
        let StagedTransaction { reads, writes, .. } = txn;

        let mut guard = state.write();
        if faults.take_conflict() || !guard.validate(&reads) {
            metrics::record_transaction_conflict();
            debug!(attempt, max_attempts, "Transaction read set invalidated, retrying");
            continue;
        }
        if writes.is_empty() {
            metrics::record_transaction_attempts(attempt);
            return Ok(value);
        }

        let undo = guard.apply(writes);
        let persisted = if faults.take_failure() {
            Err(StoreError::backend("injected commit failure"))
        } else {
            persist(&*guard)
        };
        if let Err(err) = persisted {
            guard.revert(undo);
            warn!(attempt, error = %err, "Commit failed, writes rolled back");
            return Err(err.into());
        }

        metrics::record_transaction_attempts(attempt);
        return Ok(value);
    }

    warn!(max_attempts, "Transaction retry budget exhausted");
    Err(StoreError::Conflict {
        attempts: max_attempts,
    }
    .into())
}
