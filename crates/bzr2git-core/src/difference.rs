//! Revisions present in one branch's ancestry but not the other's.

use std::collections::BTreeSet;

use bzr2git_bzr::{BranchOps, RevisionId};

use crate::error::Result;

/// Symmetric difference between two branch tips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Difference {
    /// Reachable from the upstream tip only.
    pub upstream_only: BTreeSet<RevisionId>,
    /// Reachable from the source tip only; these are the revisions to replay.
    pub source_only: BTreeSet<RevisionId>,
}

/// All revisions reachable from `tip` in `graph`, `tip` included.
///
/// Ghosts (ids the graph has no entry for) are left out.
///
/// # Errors
/// Returns error if a parent-map query fails.
pub fn ancestry<B: BranchOps>(graph: &B, tip: &RevisionId) -> Result<BTreeSet<RevisionId>> {
    let mut seen = BTreeSet::new();
    let mut frontier: BTreeSet<RevisionId> = BTreeSet::new();
    if !tip.is_null() {
        frontier.insert(tip.clone());
    }

    while !frontier.is_empty() {
        let parents = graph.parent_map(&frontier)?;
        let mut next = BTreeSet::new();

        for (id, parent_ids) in parents {
            for parent in parent_ids {
                if !parent.is_null() && !seen.contains(&parent) && !frontier.contains(&parent) {
                    next.insert(parent);
                }
            }
            seen.insert(id);
        }

        frontier = next;
    }

    Ok(seen)
}

/// Compare `source` against `upstream`.
///
/// Holds a write lock on `source` throughout, so upstream's ancestry can be
/// fetched into it before the comparison. The lock is released on every
/// return path.
///
/// # Errors
/// Returns error if either tip cannot be read, the fetch fails or a graph
/// query fails.
pub fn find_difference<B: BranchOps>(upstream: &B, source: &B) -> Result<Difference> {
    let _lock = source.lock_write()?;

    let source_tip = source.last_revision()?;
    let upstream_tip = upstream.last_revision()?;
    source.fetch_from(upstream, &upstream_tip)?;

    tracing::debug!(
        "searching for missing revisions between {} and {}",
        source.base().display(),
        upstream.base().display()
    );

    let ours = ancestry(source, &source_tip)?;
    let theirs = ancestry(source, &upstream_tip)?;

    Ok(Difference {
        upstream_only: theirs.difference(&ours).cloned().collect(),
        source_only: ours.difference(&theirs).cloned().collect(),
    })
}
