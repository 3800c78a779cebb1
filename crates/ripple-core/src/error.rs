//! Error taxonomy shared by the engine, the catalog loaders, and the stores.
//!
//! Defined in `ripple-core` so the session controller can classify failures
//! from any catalog source or exam store without string matching. An empty
//! candidate pool is deliberately absent here: it is a reported outcome of
//! assembly and replacement, not an error.

use thiserror::Error;

/// Failures while fetching or validating a catalog resource.
///
/// `Clone` because one in-flight fetch is shared by every concurrent caller
/// asking for the same resource, and each of them receives the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} while fetching {resource}")]
    Status { resource: String, status: u16 },

    /// The resource could not be reached at all.
    #[error("network error while fetching {resource}: {message}")]
    Network { resource: String, message: String },

    /// The request did not complete in time.
    #[error("fetching {resource} timed out after {secs}s")]
    Timeout { resource: String, secs: u64 },

    /// The body was not valid JSON.
    #[error("malformed JSON in {resource}: {message}")]
    Malformed { resource: String, message: String },

    /// The JSON parsed but does not have the expected shape.
    #[error("{resource} is not a valid {kind}: {message}")]
    Invalid {
        resource: String,
        kind: &'static str,
        message: String,
    },

    /// The manifest has no route with this id.
    #[error("unknown route: {0}")]
    UnknownRoute(String),
}

impl CatalogError {
    /// The resource key the failure relates to, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            CatalogError::Status { resource, .. }
            | CatalogError::Network { resource, .. }
            | CatalogError::Timeout { resource, .. }
            | CatalogError::Malformed { resource, .. }
            | CatalogError::Invalid { resource, .. } => Some(resource),
            CatalogError::UnknownRoute(_) => None,
        }
    }
}

/// Failures of the durable exam store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store could not be opened. There is no fallback to
    /// in-memory state.
    #[error("storage unavailable at {location}: {reason}")]
    StorageUnavailable { location: String, reason: String },

    /// A transaction failed after the store was opened.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt exam record {id}: {message}")]
    CorruptRecord { id: String, message: String },
}

impl StoreError {
    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::StorageUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if the store itself could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable { .. })
    }
}

/// Misuse of the exam editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// Locked slots are immune to replacement and shuffling.
    #[error("slot {index} is locked")]
    SlotLocked { index: usize },

    /// The index does not address a slot of the exam.
    #[error("slot index {index} out of range (exam has {len} slots)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The slot references an item the loaded bank does not contain.
    #[error("item {0} is not in the loaded bank")]
    UnknownItem(String),
}
