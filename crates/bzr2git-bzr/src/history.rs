//! Indexed view of a branch's full log.

use std::collections::HashMap;

use crate::log::LogEntry;
use crate::revision::{ParentMap, Revision, RevisionId, Revno};

/// A branch's ancestry and revision metadata, indexed for lookups.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<LogEntry>,
    by_id: HashMap<RevisionId, usize>,
    mainline: HashMap<Revno, usize>,
    /// Mainline revno under which each entry was listed.
    group: Vec<Option<Revno>>,
}

impl History {
    /// Index log entries as printed by `bzr log -n0` (newest first, merged
    /// revisions listed under the mainline revision that merged them).
    #[must_use]
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut mainline = HashMap::new();
        let mut group = Vec::with_capacity(entries.len());
        let mut current = None;

        for (idx, entry) in entries.iter().enumerate() {
            if let Some(revno) = entry.mainline_revno() {
                mainline.insert(revno, idx);
                current = Some(revno);
            }
            by_id.insert(entry.revision.id.clone(), idx);
            group.push(current);
        }

        Self {
            entries,
            by_id,
            mainline,
            group,
        }
    }

    /// Tip of the branch; the null revision for an empty branch.
    #[must_use]
    pub fn tip(&self) -> RevisionId {
        self.mainline
            .keys()
            .max()
            .and_then(|revno| self.rev_id(*revno))
            .cloned()
            .unwrap_or_else(RevisionId::null)
    }

    /// Whether the revision is part of this history.
    #[must_use]
    pub fn contains(&self, id: &RevisionId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Revision metadata by id.
    #[must_use]
    pub fn revision(&self, id: &RevisionId) -> Option<&Revision> {
        self.by_id.get(id).map(|idx| &self.entries[*idx].revision)
    }

    /// Mainline revno of a revision; `None` when absent or merged.
    #[must_use]
    pub fn revno_of(&self, id: &RevisionId) -> Option<Revno> {
        self.by_id
            .get(id)
            .and_then(|idx| self.entries[*idx].mainline_revno())
    }

    /// Revision id at a mainline revno.
    #[must_use]
    pub fn rev_id(&self, revno: Revno) -> Option<&RevisionId> {
        self.mainline
            .get(&revno)
            .map(|idx| &self.entries[*idx].revision.id)
    }

    /// The mainline revision at `revno` followed by every revision it merged.
    #[must_use]
    pub fn merged_group(&self, revno: Revno) -> Vec<RevisionId> {
        self.entries
            .iter()
            .zip(&self.group)
            .filter(|(_, group)| **group == Some(revno))
            .map(|(entry, _)| entry.revision.id.clone())
            .collect()
    }

    /// Parents of every revision in the history.
    #[must_use]
    pub fn parent_map(&self) -> ParentMap {
        self.entries
            .iter()
            .map(|e| (e.revision.id.clone(), e.revision.parents.clone()))
            .collect()
    }

    /// Number of revisions, merged ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the branch has no revisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
