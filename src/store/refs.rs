//! Branch and HEAD management.
//!
//! Refs are the only mutable part of the store: a branch name maps to the
//! commit at its tip, and HEAD names either a branch (symbolic) or a commit
//! directly (detached). The single mutating primitive on branch tips is a
//! compare-and-swap, which is the synchronization point for concurrent
//! writers — no lock is held across an entire move, only here.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{BranchName, CommitId, Head};

/// The branch table plus HEAD for one game.
///
/// Clone this to share across threads - it uses Arc internally.
#[derive(Debug, Clone)]
pub struct RefTable {
    inner: Arc<RwLock<RefInner>>,
}

#[derive(Debug)]
struct RefInner {
    branches: BTreeMap<BranchName, CommitId>,
    head: Head,
}

impl RefTable {
    /// Bootstrap a table with a single branch pointing at the root commit
    /// and HEAD attached to it.
    pub fn new(branch: BranchName, at: CommitId) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(branch.clone(), at);
        Self {
            inner: Arc::new(RwLock::new(RefInner { branches, head: Head::Symbolic(branch) })),
        }
    }

    /// the current HEAD pointer
    pub fn head(&self) -> Head {
        self.inner.read().head.clone()
    }

    /// the branch HEAD is attached to, if it is not detached
    pub fn current_branch(&self) -> Option<BranchName> {
        self.inner.read().head.branch().cloned()
    }

    /// Resolve a branch name to the commit at its tip.
    pub fn resolve(&self, branch: &BranchName) -> StoreResult<CommitId> {
        self.inner
            .read()
            .branches
            .get(branch)
            .copied()
            .ok_or_else(|| StoreError::RefNotFound(branch.to_string()))
    }

    /// Resolve HEAD to a commit: through the named branch when symbolic,
    /// directly when detached.
    pub fn resolve_head(&self) -> StoreResult<CommitId> {
        let inner = self.inner.read();
        match &inner.head {
            Head::Symbolic(branch) => inner
                .branches
                .get(branch)
                .copied()
                .ok_or_else(|| StoreError::RefNotFound(branch.to_string())),
            Head::Detached(commit) => Ok(*commit),
        }
    }

    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.inner.read().branches.contains_key(branch)
    }

    /// Create a new branch pointing to the given commit. Does not move HEAD.
    pub fn create_branch(&self, branch: &BranchName, at: CommitId) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.branches.contains_key(branch) {
            return Err(StoreError::BranchAlreadyExists(branch.to_string()));
        }
        inner.branches.insert(branch.clone(), at);
        Ok(())
    }

    /// Advance a branch only if it still points to the expected commit.
    ///
    /// Compare-and-swap: the check and the write happen under one lock, so
    /// a concurrent writer is detected, not overwritten.
    pub fn update_branch(
        &self,
        branch: &BranchName,
        expected: CommitId,
        new_target: CommitId,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let current = inner
            .branches
            .get_mut(branch)
            .ok_or_else(|| StoreError::RefNotFound(branch.to_string()))?;

        if *current != expected {
            return Err(StoreError::ConcurrentModification { branch: branch.to_string() });
        }

        *current = new_target;
        Ok(())
    }

    /// Attach HEAD to an existing branch.
    pub fn set_head(&self, branch: &BranchName) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.branches.contains_key(branch) {
            return Err(StoreError::RefNotFound(branch.to_string()));
        }
        inner.head = Head::Symbolic(branch.clone());
        Ok(())
    }

    /// Point HEAD directly at a commit, off any branch.
    pub fn detach_head(&self, at: CommitId) {
        self.inner.write().head = Head::Detached(at);
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> Vec<BranchName> {
        self.inner.read().branches.keys().cloned().collect()
    }
}
