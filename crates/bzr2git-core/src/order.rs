//! Replay ordering: parents before children.

use std::collections::{BTreeMap, BTreeSet};

use bzr2git_bzr::{BranchOps, ParentMap, RevisionId};

use crate::error::{Error, Result};

/// Topologically sort the revisions keyed in `parent_map`.
///
/// Parents that are not keys of the map are ignored. Among revisions that
/// are ready at the same time, the smallest id goes first.
///
/// # Errors
/// Returns [`Error::CyclicAncestry`] if the restricted graph has a cycle.
pub fn topo_sort(parent_map: &ParentMap) -> Result<Vec<RevisionId>> {
    let mut pending: BTreeMap<&RevisionId, usize> = BTreeMap::new();
    let mut children: BTreeMap<&RevisionId, Vec<&RevisionId>> = BTreeMap::new();

    for (id, parents) in parent_map {
        let in_set: BTreeSet<&RevisionId> = parents
            .iter()
            .filter(|p| parent_map.contains_key(*p))
            .collect();
        pending.insert(id, in_set.len());
        for parent in in_set {
            children.entry(parent).or_default().push(id);
        }
    }

    let mut ready: BTreeSet<&RevisionId> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut order = Vec::with_capacity(parent_map.len());

    while let Some(id) = ready.pop_first() {
        order.push(id.clone());
        for child in children.get(id).into_iter().flatten() {
            if let Some(count) = pending.get_mut(child) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*child);
                }
            }
        }
    }

    if order.len() < parent_map.len() {
        let stuck = pending
            .iter()
            .find(|(_, count)| **count > 0)
            .map(|(id, _)| id.to_string())
            .unwrap_or_default();
        return Err(Error::CyclicAncestry(stuck));
    }

    Ok(order)
}

/// Order the revisions of `set` for replay.
///
/// The parent map is read under a write lock on `source`.
///
/// # Errors
/// Returns error if the graph query fails or the graph is cyclic.
pub fn replay_order<B: BranchOps>(source: &B, set: &BTreeSet<RevisionId>) -> Result<Vec<RevisionId>> {
    let parent_map = {
        let _lock = source.lock_write()?;
        source.parent_map(set)?
    };
    topo_sort(&parent_map)
}
