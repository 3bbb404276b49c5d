//! Trait abstractions for working-tree operations.
//!
//! This module defines the `WorkTreeOps` trait which abstracts the git side
//! of a replay, enabling dependency injection and testability.

use std::path::Path;

use git2::Oid;

use crate::{CommitIdentity, PatchOutcome, Repository, Result};

/// Trait for the working-tree operations a replay performs.
///
/// This trait abstracts git operations, allowing for:
/// - Dependency injection in the replay engine
/// - Mock implementations for testing
#[allow(clippy::missing_errors_doc)]
pub trait WorkTreeOps {
    /// Get the working directory path.
    fn workdir(&self) -> Option<&Path>;

    /// Apply a unified diff with the given strip level, writing
    /// diagnostics to `rejects`.
    fn apply_patch(&self, diff: &Path, strip: u8, rejects: &Path) -> Result<PatchOutcome>;

    /// Rename a tracked path.
    fn rename_path(&self, from: &str, to: &str) -> Result<()>;

    /// Stage all changes, deletions included.
    fn stage_all(&self) -> Result<()>;

    /// Commit the index with a forged author.
    fn commit_as(&self, identity: &CommitIdentity, message: &str) -> Result<Oid>;

    /// Discard uncommitted changes to tracked files.
    fn reset_hard(&self) -> Result<()>;

    /// Remove untracked files, returning how many were removed.
    fn clean_untracked(&self) -> Result<usize>;
}

impl WorkTreeOps for Repository {
    fn workdir(&self) -> Option<&Path> {
        Self::workdir(self)
    }

    fn apply_patch(&self, diff: &Path, strip: u8, rejects: &Path) -> Result<PatchOutcome> {
        Self::apply_patch(self, diff, strip, rejects)
    }

    fn rename_path(&self, from: &str, to: &str) -> Result<()> {
        Self::rename_path(self, from, to)
    }

    fn stage_all(&self) -> Result<()> {
        Self::stage_all(self)
    }

    fn commit_as(&self, identity: &CommitIdentity, message: &str) -> Result<Oid> {
        Self::commit_as(self, identity, message)
    }

    fn reset_hard(&self) -> Result<()> {
        Self::reset_hard(self)
    }

    fn clean_untracked(&self) -> Result<usize> {
        Self::clean_untracked(self)
    }
}
