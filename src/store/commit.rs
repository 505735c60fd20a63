//! Commits, manifests, and history traversal.
//!
//! A commit links a manifest to its parent, forming the history chain; the
//! manifest is a one-level indirection from logical names to snapshot ids,
//! so the commit shape never changes if more parts are recorded per move
//! later. This module handles commit construction and ancestor walking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::error::{StoreError, StoreResult};
use crate::store::object::ObjectStore;
use crate::store::types::{CommitId, ManifestId, SnapshotId};

/// the logical name the board snapshot is recorded under
pub const BOARD_ENTRY: &str = "board";

/// mapping from logical part names to snapshot ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    entries: BTreeMap<String, SnapshotId>,
}

impl Manifest {
    /// the standard single-entry manifest holding a board snapshot
    pub fn for_board(snapshot: SnapshotId) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(BOARD_ENTRY.to_string(), snapshot);
        Self { entries }
    }

    /// the board snapshot id, if this manifest records one
    pub fn board(&self) -> Option<SnapshotId> {
        self.entries.get(BOARD_ENTRY).copied()
    }

    pub fn entries(&self) -> &BTreeMap<String, SnapshotId> {
        &self.entries
    }
}

/// An immutable history node. Content-hashed over all fields including the
/// parent link, so a commit pins its entire ancestry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub manifest: ManifestId,
    /// empty only for the root commit
    pub parent: Option<CommitId>,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// get a short summary of the commit (first line of message)
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }
}

/// builder for creating commits with a fluent interface
pub struct CommitBuilder {
    manifest: Option<ManifestId>,
    parent: Option<CommitId>,
    message: String,
    author: String,
}

impl CommitBuilder {
    pub fn new() -> Self {
        Self {
            manifest: None,
            parent: None,
            message: String::new(),
            author: "gogogo".to_string(),
        }
    }

    /// set the manifest for this commit
    pub fn manifest(mut self, manifest: ManifestId) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// set the parent commit (omit for a root commit)
    pub fn parent(mut self, parent: CommitId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// set the commit message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// timestamp, write the commit into the store, and return its id
    pub fn commit(self, store: &ObjectStore) -> StoreResult<CommitId> {
        let manifest = self
            .manifest
            .ok_or_else(|| StoreError::Internal("commit requires a manifest".to_string()))?;

        store.put_commit(&Commit {
            manifest,
            parent: self.parent,
            message: self.message,
            author: self.author,
            timestamp: Utc::now(),
        })
    }
}

impl Default for CommitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy walk over a commit's ancestry, newest first, ending at the root.
///
/// Each call to [`ancestors`] produces an independent walker, so the
/// sequence is restartable. A broken parent link surfaces as an error item
/// and ends the walk.
pub struct Ancestors {
    store: ObjectStore,
    next: Option<CommitId>,
}

impl Iterator for Ancestors {
    type Item = StoreResult<(CommitId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.store.get_commit(id) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// iterate over commit history starting from (and including) `start`
pub fn ancestors(store: &ObjectStore, start: CommitId) -> Ancestors {
    Ancestors { store: store.clone(), next: Some(start) }
}

/// Walk `back` parent links from `start`; `back = 0` is `start` itself.
///
/// Returns `Ok(None)` when the chain ends before `back` steps.
pub fn nth_ancestor(
    store: &ObjectStore,
    start: CommitId,
    back: usize,
) -> StoreResult<Option<CommitId>> {
    let mut current = start;
    for _ in 0..back {
        let commit = store.get_commit(current)?;
        match commit.parent {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
