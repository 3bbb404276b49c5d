//! The person (or script) watching a replay run.
//!
//! The engine reports progress and, in interactive mode, asks before each
//! revision and waits for manual conflict resolution through this trait.

use bzr2git_bzr::{Rename, Revno};
use bzr2git_git::PatchOutcome;

use crate::Result;

/// Progress notice for a revision about to be replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement<'a> {
    /// Launchpad project name.
    pub project: &'a str,
    /// Branch label.
    pub branch: &'a str,
    /// Mainline revno in the source branch.
    pub revno: Revno,
    /// Origin URL of the revision.
    pub origin_url: &'a str,
    /// Original commit message.
    pub message: &'a str,
}

/// Why a revision could not be applied automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    /// Mainline revno in the source branch.
    pub revno: Revno,
    /// Result of running `patch`.
    pub patch: PatchOutcome,
    /// Renames `git mv` refused.
    pub failed_renames: Vec<Rename>,
    /// What `patch` wrote to stderr.
    pub rejects: String,
}

impl ApplyFailure {
    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.patch.is_applied(), self.failed_renames.len()) {
            (false, 0) => "patch failed".to_string(),
            (true, n) => format!("{n} rename(s) failed"),
            (false, n) => format!("patch and {n} rename(s) failed"),
        }
    }
}

/// Trait for operator interaction.
#[allow(clippy::missing_errors_doc)]
pub trait Operator {
    /// Show which revision is being replayed.
    fn announce(&self, announcement: &Announcement<'_>);

    /// Ask whether to apply the announced revision (interactive mode).
    fn confirm_apply(&self, announcement: &Announcement<'_>) -> Result<bool>;

    /// Block until the operator has fixed a failed application by hand
    /// (interactive mode).
    fn await_manual_fix(&self, failure: &ApplyFailure) -> Result<()>;
}
