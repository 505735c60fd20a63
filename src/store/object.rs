//! Content-addressable object storage.
//!
//! Three record kinds live here: board snapshots, manifests, and commits.
//! Each is keyed by the SHA-256 of its canonical JSON encoding, so identical
//! content stored twice occupies one slot and `put` is idempotent. The
//! encoding is deterministic: struct fields serialize in declaration order
//! and every collection is a `BTreeMap`/`BTreeSet`, so key order never
//! depends on insertion order.
//!
//! Objects are immutable once written and never deleted; abandoned writes
//! are harmless orphans.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::store::commit::{Commit, Manifest};
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{CommitId, ManifestId, ObjectId, SnapshotId};

/// the unit of storage; the enum tag is part of the canonical encoding, so
/// two kinds can never hash to the same id even with identical payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    Snapshot(BoardState),
    Manifest(Manifest),
    Commit(Commit),
}

impl Object {
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Snapshot(_) => "snapshot",
            Object::Manifest(_) => "manifest",
            Object::Commit(_) => "commit",
        }
    }
}

/// encode an object into its canonical hashable bytes
pub(crate) fn canonical_encode(object: &Object) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(object)?)
}

/// The append-only, content-addressed object store.
///
/// Clone this to share across threads - it uses Arc internally. Reads and
/// writes are both safe to race: content under a given id never changes.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    inner: Arc<RwLock<HashMap<ObjectId, Vec<u8>>>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, returning its content address.
    ///
    /// A no-op when an object with the same content already exists;
    /// idempotent and safe to call from multiple writers.
    pub fn put(&self, object: &Object) -> StoreResult<ObjectId> {
        let bytes = canonical_encode(object)?;
        let id = ObjectId::digest(&bytes);

        let mut objects = self.inner.write();
        objects.entry(id).or_insert(bytes);
        Ok(id)
    }

    /// Fetch and decode an object by id.
    ///
    /// Recomputes the stored bytes' hash as an integrity check; a mismatch
    /// or an undecodable payload is `Corrupt`, and a snapshot whose board
    /// violates the structural invariants is `Corrupt` too.
    pub fn get(&self, id: ObjectId) -> StoreResult<Object> {
        let bytes = self
            .inner
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))?;

        if ObjectId::digest(&bytes) != id {
            return Err(StoreError::Corrupt {
                id,
                reason: "stored content does not hash to its key".to_string(),
            });
        }

        let object: Object = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            id,
            reason: format!("undecodable object: {}", e),
        })?;

        if let Object::Snapshot(board) = &object {
            board.validate().map_err(|e| StoreError::Corrupt {
                id,
                reason: format!("snapshot violates board invariants: {}", e),
            })?;
        }

        Ok(object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains_key(&id)
    }

    /// number of distinct objects stored
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    // ==================== Typed helpers ====================

    pub fn put_snapshot(&self, board: &BoardState) -> StoreResult<SnapshotId> {
        self.put(&Object::Snapshot(board.clone())).map(SnapshotId::new)
    }

    pub fn put_manifest(&self, manifest: &Manifest) -> StoreResult<ManifestId> {
        self.put(&Object::Manifest(manifest.clone())).map(ManifestId::new)
    }

    pub fn put_commit(&self, commit: &Commit) -> StoreResult<CommitId> {
        self.put(&Object::Commit(commit.clone())).map(CommitId::new)
    }

    pub fn get_snapshot(&self, id: SnapshotId) -> StoreResult<BoardState> {
        match self.get(id.raw())? {
            Object::Snapshot(board) => Ok(board),
            other => Err(StoreError::UnexpectedKind {
                id: id.raw(),
                expected: "snapshot",
                found: other.kind(),
            }),
        }
    }

    pub fn get_manifest(&self, id: ManifestId) -> StoreResult<Manifest> {
        match self.get(id.raw())? {
            Object::Manifest(manifest) => Ok(manifest),
            other => Err(StoreError::UnexpectedKind {
                id: id.raw(),
                expected: "manifest",
                found: other.kind(),
            }),
        }
    }

    pub fn get_commit(&self, id: CommitId) -> StoreResult<Commit> {
        match self.get(id.raw())? {
            Object::Commit(commit) => Ok(commit),
            other => Err(StoreError::UnexpectedKind {
                id: id.raw(),
                expected: "commit",
                found: other.kind(),
            }),
        }
    }

    /// store raw bytes under an arbitrary key, bypassing hashing; only for
    /// exercising the integrity check
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, id: ObjectId, bytes: Vec<u8>) {
        self.inner.write().insert(id, bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlayerId;

    fn empty_board() -> BoardState {
        BoardState::new(5, 5, vec![PlayerId::black(), PlayerId::white()]).unwrap()
    }

    #[test]
    fn test_put_is_deterministic_and_dedups() {
        let store = ObjectStore::new();
        let board = empty_board();

        let a = store.put_snapshot(&board).unwrap();
        let b = store.put_snapshot(&board).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);

        // from an independent store too
        let other = ObjectStore::new();
        let c = other.put_snapshot(&board).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = ObjectStore::new();
        let board = empty_board();
        let player = PlayerId::black();
        let board = board.place(&player, 2, 2).unwrap();

        let id = store.put_snapshot(&board).unwrap();
        let back = store.get_snapshot(id).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = ObjectStore::new();
        let id = ObjectId::digest(b"never stored");
        let result = store.get(id);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_corruption_detected() {
        let store = ObjectStore::new();
        let board = empty_board();
        let id = store.put_snapshot(&board).unwrap();

        // overwrite the slot with bytes that no longer hash to the key
        store.insert_raw(id.raw(), b"tampered".to_vec());
        let result = store.get_snapshot(id);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_wrong_kind_detected() {
        let store = ObjectStore::new();
        let board = empty_board();
        let snapshot = store.put_snapshot(&board).unwrap();

        // ask for a commit at a snapshot's address
        let result = store.get_commit(CommitId::new(snapshot.raw()));
        assert!(matches!(
            result,
            Err(StoreError::UnexpectedKind { expected: "commit", found: "snapshot", .. })
        ));
    }

    #[test]
    fn test_different_kinds_never_collide() {
        let store = ObjectStore::new();
        let board = empty_board();

        let snapshot = store.put_snapshot(&board).unwrap();
        let manifest = store.put_manifest(&Manifest::for_board(snapshot)).unwrap();
        assert_ne!(snapshot.raw(), manifest.raw());
        assert_eq!(store.len(), 2);
    }
}
