//! Revision model shared by the branch handle and the replay engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Mainline position of a revision within a branch.
pub type Revno = u32;

/// Revision id to parent ids, as returned by graph queries.
pub type ParentMap = BTreeMap<RevisionId, Vec<RevisionId>>;

/// Opaque Bazaar revision identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevisionId(String);

impl RevisionId {
    /// Id Bazaar uses for the tip of an empty branch.
    pub const NULL: &'static str = "null:";

    /// Wrap a raw revision id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The null revision.
    #[must_use]
    pub fn null() -> Self {
        Self(Self::NULL.to_string())
    }

    /// Whether this is the null revision.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL
    }

    /// Get as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A revision as recorded in the source history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Revision id.
    pub id: RevisionId,
    /// Commit message, without trailing blank lines.
    pub message: String,
    /// Commit time with the committer's UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Committer identity, `Name <email>`.
    pub committer: String,
    /// Explicit authors; empty when the committer is the author.
    pub authors: Vec<String>,
    /// Parent revision ids, leftmost first.
    pub parents: Vec<RevisionId>,
    /// Bug tracker URLs this revision fixes.
    pub bugs: Vec<String>,
}

impl Revision {
    /// Authors to credit, falling back to the committer.
    #[must_use]
    pub fn apparent_authors(&self) -> Vec<&str> {
        if self.authors.is_empty() {
            vec![self.committer.as_str()]
        } else {
            self.authors.iter().map(String::as_str).collect()
        }
    }
}

/// A single path rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// Path before the revision.
    pub from: String,
    /// Path after the revision.
    pub to: String,
}

/// Paths touched between a revno and its mainline predecessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionDelta {
    /// Newly versioned paths.
    pub added: Vec<String>,
    /// Paths no longer versioned.
    pub removed: Vec<String>,
    /// Paths with content or kind changes.
    pub modified: Vec<String>,
    /// Renamed paths.
    pub renamed: Vec<Rename>,
}

impl RevisionDelta {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty()
    }
}

/// Outcome of looking up a revision's mainline revno.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevnoLookup {
    /// The revision sits on the mainline at this revno.
    Resolved(Revno),
    /// The revision is absent or only reachable through a merge.
    NotFound,
    /// The branch could not be queried; the lookup may succeed on retry.
    Transient(String),
}

/// Diff label rewrite passed to `bzr diff --prefix OLD:NEW`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    /// Label for the old side.
    pub old: String,
    /// Label for the new side.
    pub new: String,
}

impl PathPrefix {
    /// Map a directory onto itself on both sides of the diff.
    #[must_use]
    pub fn same(dir: &str) -> Self {
        Self {
            old: dir.to_string(),
            new: dir.to_string(),
        }
    }

    /// Render as the `--prefix` argument.
    #[must_use]
    pub fn as_arg(&self) -> String {
        format!("{}:{}", self.old, self.new)
    }

    /// Rewrite a branch-relative path the way the new side of the diff sees it.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        format!("{}{path}", self.new)
    }
}
