//! Typed document access on top of the JSON document store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_types::DocumentPath;

use crate::domain::errors::RegistryResult;
use crate::ports::outbound::{DocumentTransaction, StoreError};

pub(crate) fn decode<D: DeserializeOwned>(path: &DocumentPath, value: Value) -> RegistryResult<D> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::codec(format!("{path}: {e}")).into())
}

/// Transactional read of a typed document.
pub(crate) fn read_doc<D: DeserializeOwned>(
    txn: &mut dyn DocumentTransaction,
    path: &DocumentPath,
) -> RegistryResult<Option<D>> {
    txn.get(path)?.map(|value| decode(path, value)).transpose()
}

/// Buffered write of a typed document.
pub(crate) fn write_doc<D: Serialize>(
    txn: &mut dyn DocumentTransaction,
    path: DocumentPath,
    doc: &D,
) -> RegistryResult<()> {
    let value =
        serde_json::to_value(doc).map_err(|e| StoreError::codec(format!("{path}: {e}")))?;
    txn.set(path, value)?;
    Ok(())
}
