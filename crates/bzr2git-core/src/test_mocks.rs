//! Mock implementations for testing the replay logic.
//!
//! These mocks implement the traits from bzr2git-bzr, bzr2git-git and
//! bzr2git-core so selection, ordering and replay can be unit tested
//! without Bazaar branches or git repositories.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bzr2git_bzr::{
    BranchOps, Error as BzrError, ParentMap, PathPrefix, Result as BzrResult, Revision,
    RevisionDelta, RevisionId, Revno, RevnoLookup, WriteLock,
};
use bzr2git_git::{CommitIdentity, Oid, PatchOutcome, Result as GitResult, WorkTreeOps};
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::Result;
use crate::operator::{Announcement, ApplyFailure, Operator};

/// Set of revision ids from string literals.
pub fn ids(names: &[&str]) -> BTreeSet<RevisionId> {
    names.iter().map(|name| RevisionId::from(*name)).collect()
}

/// In-memory branch.
///
/// Mainline revisions get revnos in the order they are added. Revisions
/// added with `with_merged` belong to the next mainline revision.
pub struct MockBranch {
    pub base: PathBuf,
    pub revisions: BTreeMap<RevisionId, Revision>,
    pub mainline: Vec<RevisionId>,
    pub groups: HashMap<Revno, Vec<RevisionId>>,
    pub unassigned: Vec<RevisionId>,
    pub deltas: HashMap<Revno, RevisionDelta>,
    pub diffs: HashMap<Revno, String>,
    pub fetched: RefCell<ParentMap>,
    pub fetches: Cell<usize>,
    pub failing_fetch: bool,
    pub transient_lookups: Cell<u32>,
    pub holders: Rc<Cell<usize>>,
}

impl MockBranch {
    pub fn new(name: &str) -> Self {
        Self {
            base: PathBuf::from("/branches").join(name),
            revisions: BTreeMap::new(),
            mainline: Vec::new(),
            groups: HashMap::new(),
            unassigned: Vec::new(),
            deltas: HashMap::new(),
            diffs: HashMap::new(),
            fetched: RefCell::new(ParentMap::new()),
            fetches: Cell::new(0),
            failing_fetch: false,
            transient_lookups: Cell::new(0),
            holders: Rc::new(Cell::new(0)),
        }
    }

    /// Commit time of the mainline revision at `revno`; merged revisions
    /// use revno 0.
    pub fn timestamp_of(revno: Revno) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .timestamp_opt(1_368_187_200 + i64::from(revno) * 3600, 0)
            .unwrap()
    }

    fn revision(id: &str, parents: &[&str], revno: Revno) -> Revision {
        Revision {
            id: id.into(),
            message: format!("message of {id}"),
            timestamp: Self::timestamp_of(revno),
            committer: "Test Committer <committer@example.org>".into(),
            authors: Vec::new(),
            parents: parents.iter().map(|p| RevisionId::from(*p)).collect(),
            bugs: Vec::new(),
        }
    }

    pub fn with_mainline(mut self, id: &str, parents: &[&str]) -> Self {
        self.mainline.push(id.into());
        let revno = Revno::try_from(self.mainline.len()).unwrap();

        let mut group = vec![RevisionId::from(id)];
        group.append(&mut self.unassigned);
        self.groups.insert(revno, group);

        self.revisions
            .insert(id.into(), Self::revision(id, parents, revno));
        self
    }

    pub fn with_merged(mut self, id: &str, parents: &[&str]) -> Self {
        self.unassigned.push(id.into());
        self.revisions.insert(id.into(), Self::revision(id, parents, 0));
        self
    }

    pub fn with_author(mut self, id: &str, author: &str) -> Self {
        if let Some(rev) = self.revisions.get_mut(&RevisionId::from(id)) {
            rev.authors = vec![author.to_string()];
        }
        self
    }

    pub fn with_bugs(mut self, id: &str, bugs: &[&str]) -> Self {
        if let Some(rev) = self.revisions.get_mut(&RevisionId::from(id)) {
            rev.bugs = bugs.iter().map(ToString::to_string).collect();
        }
        self
    }

    pub fn with_delta(mut self, revno: Revno, delta: RevisionDelta) -> Self {
        self.deltas.insert(revno, delta);
        self
    }

    pub fn with_diff(mut self, revno: Revno, diff: &str) -> Self {
        self.diffs.insert(revno, diff.to_string());
        self
    }

    pub fn with_failing_fetch(mut self) -> Self {
        self.failing_fetch = true;
        self
    }

    /// Fail the next `count` revno lookups transiently.
    pub fn with_transient_lookups(self, count: u32) -> Self {
        self.transient_lookups.set(count);
        self
    }

    pub fn lock_holders(&self) -> usize {
        self.holders.get()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    fn own_parent_map(&self) -> ParentMap {
        self.revisions
            .iter()
            .map(|(id, rev)| (id.clone(), rev.parents.clone()))
            .collect()
    }
}

impl BranchOps for MockBranch {
    fn base(&self) -> &Path {
        &self.base
    }

    fn lock_write(&self) -> BzrResult<WriteLock> {
        WriteLock::acquire(None, &self.holders)
    }

    fn last_revision(&self) -> BzrResult<RevisionId> {
        Ok(self.mainline.last().cloned().unwrap_or_else(RevisionId::null))
    }

    fn fetch_from(&self, other: &Self, tip: &RevisionId) -> BzrResult<()> {
        if tip.is_null()
            || self.revisions.contains_key(tip)
            || self.fetched.borrow().contains_key(tip)
        {
            return Ok(());
        }
        if self.failing_fetch {
            return Err(BzrError::Command {
                command: "fetch".into(),
                code: Some(3),
                stderr: "connection reset".into(),
            });
        }

        self.fetches.set(self.fetches.get() + 1);
        self.fetched.borrow_mut().extend(other.own_parent_map());
        Ok(())
    }

    fn parent_map(&self, ids: &BTreeSet<RevisionId>) -> BzrResult<ParentMap> {
        let fetched = self.fetched.borrow();
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.revisions
                    .get(id)
                    .map(|rev| rev.parents.clone())
                    .or_else(|| fetched.get(id).cloned())
                    .map(|parents| (id.clone(), parents))
            })
            .collect())
    }

    fn revision(&self, id: &RevisionId) -> BzrResult<Revision> {
        self.revisions
            .get(id)
            .cloned()
            .ok_or_else(|| BzrError::NoSuchRevision(id.to_string()))
    }

    fn revision_id_to_revno(&self, id: &RevisionId) -> RevnoLookup {
        let remaining = self.transient_lookups.get();
        if remaining > 0 {
            self.transient_lookups.set(remaining - 1);
            return RevnoLookup::Transient("log unavailable".into());
        }

        self.mainline
            .iter()
            .position(|m| m == id)
            .map_or(RevnoLookup::NotFound, |index| {
                RevnoLookup::Resolved(Revno::try_from(index + 1).unwrap())
            })
    }

    fn merged_revisions(&self, revno: Revno) -> BzrResult<Vec<RevisionId>> {
        self.groups
            .get(&revno)
            .cloned()
            .ok_or(BzrError::NoSuchRevno(revno))
    }

    fn revision_delta(&self, revno: Revno) -> BzrResult<RevisionDelta> {
        Ok(self.deltas.get(&revno).cloned().unwrap_or_default())
    }

    fn diff(&self, _from: Revno, to: Revno, _prefix: Option<&PathPrefix>) -> BzrResult<Vec<u8>> {
        if let Some(diff) = self.diffs.get(&to) {
            return Ok(diff.clone().into_bytes());
        }
        let index = usize::try_from(to).unwrap() - 1;
        let id = self
            .mainline
            .get(index)
            .ok_or(BzrError::NoSuchRevno(to))?;
        Ok(format!("diff of {id}").into_bytes())
    }
}

/// In-memory working tree.
///
/// A diff's text stands in for the change it makes. Applied diffs are
/// pending until committed or reset; failing diffs are half-applied.
pub struct MockWorkTree {
    pub committed: RefCell<Vec<String>>,
    pub pending: RefCell<Vec<String>>,
    pub commits: RefCell<Vec<(CommitIdentity, String)>>,
    pub failing_patches: Vec<String>,
    pub failing_renames: Vec<String>,
    pub renames: RefCell<Vec<(String, String)>>,
    pub pending_at_apply: RefCell<Vec<usize>>,
    pub last_strip: RefCell<Option<u8>>,
    pub resets: RefCell<usize>,
    pub cleans: RefCell<usize>,
}

impl Default for MockWorkTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkTree {
    pub fn new() -> Self {
        Self {
            committed: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
            failing_patches: Vec::new(),
            failing_renames: Vec::new(),
            renames: RefCell::new(Vec::new()),
            pending_at_apply: RefCell::new(Vec::new()),
            last_strip: RefCell::new(None),
            resets: RefCell::new(0),
            cleans: RefCell::new(0),
        }
    }

    pub fn with_failing_patch(mut self, diff: &str) -> Self {
        self.failing_patches.push(diff.to_string());
        self
    }

    pub fn with_failing_rename(mut self, from: &str) -> Self {
        self.failing_renames.push(from.to_string());
        self
    }

    pub fn commit_messages(&self) -> Vec<String> {
        self.commits
            .borrow()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Changes in committed history, oldest first.
    pub fn tree(&self) -> Vec<String> {
        self.committed.borrow().clone()
    }
}

impl WorkTreeOps for MockWorkTree {
    fn workdir(&self) -> Option<&Path> {
        Some(Path::new("/target"))
    }

    fn apply_patch(&self, diff: &Path, strip: u8, rejects: &Path) -> GitResult<PatchOutcome> {
        let text = std::fs::read_to_string(diff)?;
        self.pending_at_apply
            .borrow_mut()
            .push(self.pending.borrow().len());
        *self.last_strip.borrow_mut() = Some(strip);
        self.pending.borrow_mut().push(text.clone());

        if self.failing_patches.contains(&text) {
            std::fs::write(rejects, "1 out of 1 hunk FAILED\n")?;
            return Ok(PatchOutcome::Failed { exit_code: Some(1) });
        }
        Ok(PatchOutcome::Applied)
    }

    fn rename_path(&self, from: &str, to: &str) -> GitResult<()> {
        self.renames
            .borrow_mut()
            .push((from.to_string(), to.to_string()));
        if self.failing_renames.iter().any(|f| f == from) {
            return Err(bzr2git_git::Error::RenameFailed {
                from: from.to_string(),
                to: to.to_string(),
                message: "bad source".into(),
            });
        }
        Ok(())
    }

    fn stage_all(&self) -> GitResult<()> {
        Ok(())
    }

    fn commit_as(&self, identity: &CommitIdentity, message: &str) -> GitResult<Oid> {
        let changes: Vec<String> = self.pending.borrow_mut().drain(..).collect();
        self.committed.borrow_mut().extend(changes);

        let mut commits = self.commits.borrow_mut();
        commits.push((identity.clone(), message.to_string()));
        let seq = u8::try_from(commits.len()).unwrap();
        Ok(Oid::from_bytes(&[seq; 20]).unwrap())
    }

    fn reset_hard(&self) -> GitResult<()> {
        self.pending.borrow_mut().clear();
        *self.resets.borrow_mut() += 1;
        Ok(())
    }

    fn clean_untracked(&self) -> GitResult<usize> {
        *self.cleans.borrow_mut() += 1;
        Ok(0)
    }
}

/// Scripted operator.
///
/// Confirmations are answered from a queue, defaulting to yes.
pub struct MockOperator {
    pub answers: RefCell<VecDeque<bool>>,
    pub announced: RefCell<Vec<Revno>>,
    pub fixes: RefCell<Vec<Revno>>,
}

impl Default for MockOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOperator {
    pub fn new() -> Self {
        Self {
            answers: RefCell::new(VecDeque::new()),
            announced: RefCell::new(Vec::new()),
            fixes: RefCell::new(Vec::new()),
        }
    }

    pub fn with_answers(self, answers: &[bool]) -> Self {
        self.answers.borrow_mut().extend(answers);
        self
    }
}

impl Operator for MockOperator {
    fn announce(&self, announcement: &Announcement<'_>) {
        self.announced.borrow_mut().push(announcement.revno);
    }

    fn confirm_apply(&self, _announcement: &Announcement<'_>) -> Result<bool> {
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(true))
    }

    fn await_manual_fix(&self, failure: &ApplyFailure) -> Result<()> {
        self.fixes.borrow_mut().push(failure.revno);
        Ok(())
    }
}
