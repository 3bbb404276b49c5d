//! Trait abstractions for revision-graph access.
//!
//! This module defines the `BranchOps` trait which abstracts the Bazaar
//! side of a replay, enabling dependency injection and testability.

use std::collections::BTreeSet;
use std::path::Path;

use crate::Result;
use crate::lock::WriteLock;
use crate::revision::{
    ParentMap, PathPrefix, Revision, RevisionDelta, RevisionId, Revno, RevnoLookup,
};

/// Trait for revision-graph and content queries on a branch.
///
/// This trait abstracts Bazaar access, allowing for:
/// - Dependency injection in the replay engine
/// - Mock implementations for testing
#[allow(clippy::missing_errors_doc)]
pub trait BranchOps {
    // === Branch Info ===

    /// Location of the branch.
    fn base(&self) -> &Path;

    /// Take a write lock, released when the guard drops.
    fn lock_write(&self) -> Result<WriteLock>;

    /// Tip revision; the null revision for an empty branch.
    fn last_revision(&self) -> Result<RevisionId>;

    // === Graph ===

    /// Make `other`'s ancestry up to `tip` available to this branch's graph.
    fn fetch_from(&self, other: &Self, tip: &RevisionId) -> Result<()>
    where
        Self: Sized;

    /// Parents of the requested revisions. Unknown ids are left out.
    fn parent_map(&self, ids: &BTreeSet<RevisionId>) -> Result<ParentMap>;

    // === Revisions ===

    /// Revision metadata by id.
    fn revision(&self, id: &RevisionId) -> Result<Revision>;

    /// Mainline revno of a revision.
    fn revision_id_to_revno(&self, id: &RevisionId) -> RevnoLookup;

    /// The mainline revision at `revno` and every revision merged by it.
    fn merged_revisions(&self, revno: Revno) -> Result<Vec<RevisionId>>;

    /// Paths changed between `revno - 1` and `revno`.
    fn revision_delta(&self, revno: Revno) -> Result<RevisionDelta>;

    /// Unified diff between two mainline revnos.
    fn diff(&self, from: Revno, to: Revno, prefix: Option<&PathPrefix>) -> Result<Vec<u8>>;
}
