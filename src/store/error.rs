//! Version store error types.
//!
//! All errors that can occur during store operations are defined here.
//! We use `thiserror` for ergonomic error definition and better messages.

use thiserror::Error;

use crate::store::types::ObjectId;

/// the main error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// no object with the requested id exists
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// a stored object's recomputed hash no longer matches its key, or its
    /// content fails to decode/validate; fatal, never silently repaired
    #[error("corrupt object {id}: {reason}")]
    Corrupt { id: ObjectId, reason: String },

    /// the object exists but has a different kind than requested
    #[error("unexpected object kind for {id}: expected {expected}, found {found}")]
    UnexpectedKind {
        id: ObjectId,
        expected: &'static str,
        found: &'static str,
    },

    /// the requested branch does not exist
    #[error("ref not found: {0}")]
    RefNotFound(String),

    /// branch already exists
    #[error("branch already exists: {0}")]
    BranchAlreadyExists(String),

    /// compare-and-swap lost a race: the branch moved under the caller
    #[error("concurrent modification: branch {branch} was updated by another writer")]
    ConcurrentModification { branch: String },

    /// JSON serialization failed while encoding an object
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// internal error that shouldn't happen
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::RefNotFound(_))
    }

    /// check if this error is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::BranchAlreadyExists(_) | StoreError::ConcurrentModification { .. }
        )
    }

    /// check if this error is recoverable by retrying against a fresh head
    pub fn is_retriable(&self) -> bool {
        matches!(self, StoreError::ConcurrentModification { .. })
    }
}

/// result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
