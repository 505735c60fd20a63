//! Content-addressed object storage with git-style commits and branches.
//!
//! Every object (board snapshot, manifest, commit) is serialized to a
//! canonical byte form and keyed by the sha-256 of those bytes, so identical
//! content stores once and an id can always be re-verified against what it
//! names. On top of the immutable object graph sits a small mutable ref
//! table: branch tips and HEAD, advanced by compare-and-swap.
//!
//! ```text
//!  RefTable                    ObjectStore
//!  branches ──► CommitId ───► Commit ──► Manifest ──► Snapshot (board)
//!  HEAD                          │ parent
//!                                ▼
//!                              Commit ──► ...
//! ```

mod commit;
mod error;
mod object;
mod refs;
mod types;

pub use commit::{ancestors, nth_ancestor, Ancestors, Commit, CommitBuilder, Manifest, BOARD_ENTRY};
pub use error::{StoreError, StoreResult};
pub use object::{Object, ObjectStore};
pub use refs::RefTable;
pub use types::{
    BranchName, CommitId, Head, InvalidBranchName, ManifestId, ObjectId, SnapshotId,
};
