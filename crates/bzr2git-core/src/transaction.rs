//! Patch, rename and commit as one unit with compensating rollback.

use bzr2git_bzr::Rename;
use bzr2git_git::{CommitIdentity, Oid, WorkTreeOps};

use crate::error::Result;

/// Working-tree changes of one replayed revision.
///
/// Renames that succeed are remembered so a rollback can move them back
/// before the tree is reset.
pub(crate) struct ReplayTransaction<'a, W: WorkTreeOps> {
    worktree: &'a W,
    applied_renames: Vec<Rename>,
}

impl<'a, W: WorkTreeOps> ReplayTransaction<'a, W> {
    pub(crate) const fn new(worktree: &'a W) -> Self {
        Self {
            worktree,
            applied_renames: Vec::new(),
        }
    }

    /// Rename a path, returning whether `git mv` accepted it.
    pub(crate) fn rename(&mut self, rename: &Rename) -> bool {
        match self.worktree.rename_path(&rename.from, &rename.to) {
            Ok(()) => {
                self.applied_renames.push(rename.clone());
                true
            }
            Err(e) => {
                tracing::debug!(from = %rename.from, to = %rename.to, error = %e, "rename failed");
                false
            }
        }
    }

    /// Undo everything: reverse renames (latest first), reset tracked files,
    /// then remove untracked leftovers.
    pub(crate) fn rollback(self) -> Result<()> {
        for rename in self.applied_renames.iter().rev() {
            if let Err(e) = self.worktree.rename_path(&rename.to, &rename.from) {
                tracing::debug!(from = %rename.to, to = %rename.from, error = %e, "reverse rename failed");
            }
        }

        self.worktree.reset_hard()?;
        let removed = self.worktree.clean_untracked()?;
        tracing::debug!(removed, "working tree restored");
        Ok(())
    }

    /// Stage everything and commit under the given identity.
    pub(crate) fn commit(self, identity: &CommitIdentity, message: &str) -> Result<Oid> {
        self.worktree.stage_all()?;
        Ok(self.worktree.commit_as(identity, message)?)
    }
}
