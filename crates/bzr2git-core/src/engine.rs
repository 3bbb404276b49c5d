//! Replay engine.
//!
//! Replays every source revision missing from upstream onto the target
//! working tree, one git commit per revision. A revision that cannot be
//! applied cleanly is rolled back (or handed to the operator in interactive
//! mode) and the run moves on to the next one.

use std::io::Write;

use bzr2git_bzr::{BranchOps, Revision, RevisionId, Revno, RevnoLookup};
use bzr2git_git::{CommitIdentity, Oid, WorkTreeOps};
use chrono::Utc;
use tempfile::NamedTempFile;

use crate::author::{ascii_name, commit_message, parse_author};
use crate::config::Config;
use crate::difference::find_difference;
use crate::error::{Error, Result};
use crate::operator::{Announcement, ApplyFailure, Operator};
use crate::order::replay_order;
use crate::project::ProjectDescriptor;
use crate::transaction::ReplayTransaction;

/// Per-run options from the command line.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Branch label for progress messages and origin URLs.
    pub branch: String,
    /// Ask before each revision and pause on failures.
    pub interactive: bool,
}

/// What happened to one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionOutcome {
    /// Applied cleanly and committed.
    Committed { revno: Revno, oid: Oid },
    /// Committed after the operator fixed a failed application.
    CommittedAfterFix { revno: Revno, oid: Oid },
    /// Not on the source mainline; nothing to replay.
    Unresolved,
    /// The operator chose not to apply it.
    Declined { revno: Revno },
    /// Patch or rename failed; the working tree was restored.
    Reverted { revno: Revno, reason: String },
}

/// Outcomes of a whole run, in replay order.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    /// Revision id and outcome, in the order they were processed.
    pub outcomes: Vec<(RevisionId, RevisionOutcome)>,
}

impl ReplaySummary {
    fn record(&mut self, id: RevisionId, outcome: RevisionOutcome) {
        self.outcomes.push((id, outcome));
    }

    fn count(&self, pred: impl Fn(&RevisionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    /// Revisions committed, with or without a manual fix.
    #[must_use]
    pub fn committed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                RevisionOutcome::Committed { .. } | RevisionOutcome::CommittedAfterFix { .. }
            )
        })
    }

    /// Revisions committed after a manual fix.
    #[must_use]
    pub fn fixed(&self) -> usize {
        self.count(|o| matches!(o, RevisionOutcome::CommittedAfterFix { .. }))
    }

    /// Revisions skipped for lack of a mainline revno.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.count(|o| matches!(o, RevisionOutcome::Unresolved))
    }

    /// Revisions the operator declined.
    #[must_use]
    pub fn declined(&self) -> usize {
        self.count(|o| matches!(o, RevisionOutcome::Declined { .. }))
    }

    /// Revisions rolled back after a failure.
    #[must_use]
    pub fn reverted(&self) -> usize {
        self.count(|o| matches!(o, RevisionOutcome::Reverted { .. }))
    }

    /// Revisions processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Engine replaying missing source revisions onto a git working tree.
pub struct ReplayEngine<'a, B: BranchOps, W: WorkTreeOps, O: Operator> {
    upstream: &'a B,
    source: &'a B,
    worktree: &'a W,
    operator: &'a O,
    project: &'a ProjectDescriptor,
    config: &'a Config,
    options: ReplayOptions,
}

impl<'a, B: BranchOps, W: WorkTreeOps, O: Operator> ReplayEngine<'a, B, W, O> {
    /// Create a new replay engine.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        upstream: &'a B,
        source: &'a B,
        worktree: &'a W,
        operator: &'a O,
        project: &'a ProjectDescriptor,
        config: &'a Config,
        options: ReplayOptions,
    ) -> Self {
        Self {
            upstream,
            source,
            worktree,
            operator,
            project,
            config,
            options,
        }
    }

    /// Find, order and replay every missing revision.
    ///
    /// # Errors
    /// Returns error only for failures that leave the run unable to
    /// continue: branch access, git repository access, or the operator
    /// prompt.
    pub fn run(&self) -> Result<ReplaySummary> {
        tracing::debug!("finding differences");
        let difference = find_difference(self.upstream, self.source)?;
        tracing::debug!(
            "{} revisions not in the upstream branch",
            difference.source_only.len()
        );

        let order = replay_order(self.source, &difference.source_only)?;
        tracing::debug!("{} revisions to replay", order.len());

        let mut summary = ReplaySummary::default();
        for id in order {
            let outcome = self.replay_revision(&id)?;
            summary.record(id, outcome);
        }
        Ok(summary)
    }

    /// Mainline revno of `id`, retrying transient failures.
    fn resolve_revno(&self, id: &RevisionId) -> Result<Option<Revno>> {
        let attempts = self.config.general.lookup_retries.saturating_add(1);
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            match self.source.revision_id_to_revno(id) {
                RevnoLookup::Resolved(revno) => return Ok(Some(revno)),
                RevnoLookup::NotFound => return Ok(None),
                RevnoLookup::Transient(reason) => {
                    tracing::warn!(revision = %id, attempt, "revno lookup failed: {reason}");
                    last_reason = reason;
                }
            }
        }

        Err(Error::LookupExhausted {
            revision: id.to_string(),
            attempts,
            reason: last_reason,
        })
    }

    /// Bug references of the mainline revision and everything it merged.
    fn collect_bugs(&self, revno: Revno) -> Result<Vec<String>> {
        let _lock = self.source.lock_write()?;
        let mut bugs: Vec<String> = Vec::new();

        for id in self.source.merged_revisions(revno)? {
            for bug in self.source.revision(&id)?.bugs {
                if !bugs.contains(&bug) {
                    bugs.push(bug);
                }
            }
        }
        Ok(bugs)
    }

    fn identity(&self, revision: &Revision) -> CommitIdentity {
        let raw = revision
            .apparent_authors()
            .first()
            .copied()
            .unwrap_or_default();
        let author = parse_author(raw, &self.config.general.fallback_email);
        if author.fallback_email {
            tracing::warn!(author = raw, "no email in author, using {}", author.email);
        }

        CommitIdentity {
            name: ascii_name(&author.name),
            email: author.email,
            when: revision.timestamp.with_timezone(&Utc),
        }
    }

    /// Replay a single revision onto the working tree.
    ///
    /// # Errors
    /// Returns error if the branch, the repository or the operator prompt
    /// fails. Patch and rename failures are outcomes, not errors.
    pub fn replay_revision(&self, id: &RevisionId) -> Result<RevisionOutcome> {
        let Some(revno) = self.resolve_revno(id)? else {
            tracing::debug!(revision = %id, "not on the source mainline, skipping");
            return Ok(RevisionOutcome::Unresolved);
        };

        let revision = self.source.revision(id)?;
        let bugs = self.collect_bugs(revno)?;

        let project = self.project.kind.name();
        let origin_url = self.config.origin_url(project, &self.options.branch, revno);
        let announcement = Announcement {
            project,
            branch: &self.options.branch,
            revno,
            origin_url: &origin_url,
            message: &revision.message,
        };
        self.operator.announce(&announcement);

        if self.options.interactive && !self.operator.confirm_apply(&announcement)? {
            return Ok(RevisionOutcome::Declined { revno });
        }

        let diff = self
            .source
            .diff(revno - 1, revno, self.project.prefix.as_ref())?;
        let delta = self.source.revision_delta(revno)?;

        let mut diff_file = NamedTempFile::new()?;
        diff_file.write_all(&diff)?;
        diff_file.flush()?;
        let rejects_file = NamedTempFile::new()?;

        let patch = if diff.is_empty() {
            tracing::debug!(revno, "empty diff, nothing to patch");
            bzr2git_git::PatchOutcome::Applied
        } else {
            self.worktree.apply_patch(
                diff_file.path(),
                self.project.patch_strip(),
                rejects_file.path(),
            )?
        };

        let mut transaction = ReplayTransaction::new(self.worktree);
        let failed_renames: Vec<_> = delta
            .renamed
            .iter()
            .map(|rename| bzr2git_bzr::Rename {
                from: self.project.target_path(&rename.from),
                to: self.project.target_path(&rename.to),
            })
            .filter(|rename| !transaction.rename(rename))
            .collect();

        let mut fixed = false;
        if !patch.is_applied() || !failed_renames.is_empty() {
            let failure = ApplyFailure {
                revno,
                patch,
                failed_renames,
                rejects: std::fs::read_to_string(rejects_file.path()).unwrap_or_default(),
            };

            if !self.options.interactive {
                tracing::error!(revno, "{}, reverting", failure.summary());
                if !failure.rejects.is_empty() {
                    tracing::debug!("patch output:\n{}", failure.rejects.trim_end());
                }
                transaction.rollback()?;
                return Ok(RevisionOutcome::Reverted {
                    revno,
                    reason: failure.summary(),
                });
            }

            self.operator.await_manual_fix(&failure)?;
            fixed = true;
        }

        let identity = self.identity(&revision);
        let message = commit_message(&revision.message, &bugs);
        let oid = transaction.commit(&identity, &message)?;
        tracing::info!(revno, commit = %oid, "committed");

        Ok(if fixed {
            RevisionOutcome::CommittedAfterFix { revno, oid }
        } else {
            RevisionOutcome::Committed { revno, oid }
        })
    }
}
