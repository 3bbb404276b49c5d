//! Branch handle backed by the `bzr` program.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::history::History;
use crate::lock::WriteLock;
use crate::log::parse_long_log;
use crate::revision::{
    ParentMap, PathPrefix, Revision, RevisionDelta, RevisionId, Revno, RevnoLookup,
};
use crate::status::parse_short_status;
use crate::traits::BranchOps;

const LOCK_FILE: &str = "bzr2git.lock";

/// A local Bazaar branch.
///
/// The full log is read once, on first use, and cached for the lifetime of
/// the handle. Ancestry fetched from another branch is kept alongside it.
pub struct BzrBranch {
    base: PathBuf,
    program: String,
    history: RefCell<Option<Rc<History>>>,
    fetched: RefCell<ParentMap>,
    lock_holders: Rc<Cell<usize>>,
}

impl BzrBranch {
    /// Open the branch rooted at `path`.
    ///
    /// # Errors
    /// Returns [`Error::NotABranch`] if `path` has no `.bzr/branch`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !is_branch_root(path) {
            return Err(Error::NotABranch(path.to_path_buf()));
        }

        Ok(Self {
            base: path.to_path_buf(),
            program: "bzr".into(),
            history: RefCell::new(None),
            fetched: RefCell::new(ParentMap::new()),
            lock_holders: Rc::new(Cell::new(0)),
        })
    }

    /// Open the branch containing `path` or one of its parents.
    ///
    /// # Errors
    /// Returns [`Error::NotABranch`] if no parent is a branch root.
    pub fn open_containing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.ancestors()
            .find(|candidate| is_branch_root(candidate))
            .map_or_else(|| Err(Error::NotABranch(path.to_path_buf())), Self::open)
    }

    /// Use a different `bzr` executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(branch = %self.base.display(), "bzr {}", args.join(" "));
        Command::new(&self.program)
            .args(args)
            .current_dir(&self.base)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn command_error(args: &[&str], output: &Output) -> Error {
        Error::Command {
            command: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// The branch's indexed log, read on first use.
    ///
    /// # Errors
    /// Returns error if `bzr log` fails or its output cannot be parsed.
    pub fn history(&self) -> Result<Rc<History>> {
        if let Some(history) = self.history.borrow().as_ref() {
            return Ok(Rc::clone(history));
        }

        let args = ["log", "--long", "--show-ids", "-n0"];
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(Self::command_error(&args, &output));
        }

        let entries = parse_long_log(&String::from_utf8_lossy(&output.stdout))?;
        let history = Rc::new(History::from_entries(entries));
        tracing::debug!(
            branch = %self.base.display(),
            revisions = history.len(),
            "loaded branch history"
        );

        *self.history.borrow_mut() = Some(Rc::clone(&history));
        Ok(history)
    }

    fn knows(&self, id: &RevisionId) -> Result<bool> {
        Ok(id.is_null() || self.history()?.contains(id) || self.fetched.borrow().contains_key(id))
    }
}

fn is_branch_root(path: &Path) -> bool {
    path.join(".bzr").join("branch").is_dir()
}

impl BranchOps for BzrBranch {
    fn base(&self) -> &Path {
        &self.base
    }

    fn lock_write(&self) -> Result<WriteLock> {
        WriteLock::acquire(
            Some(self.base.join(".bzr").join(LOCK_FILE)),
            &self.lock_holders,
        )
    }

    fn last_revision(&self) -> Result<RevisionId> {
        Ok(self.history()?.tip())
    }

    fn fetch_from(&self, other: &Self, tip: &RevisionId) -> Result<()> {
        if self.knows(tip)? {
            return Ok(());
        }

        let theirs = other.history()?.parent_map();
        tracing::debug!(
            from = %other.base.display(),
            into = %self.base.display(),
            revisions = theirs.len(),
            "fetching ancestry"
        );
        self.fetched.borrow_mut().extend(theirs);
        Ok(())
    }

    fn parent_map(&self, ids: &BTreeSet<RevisionId>) -> Result<ParentMap> {
        let history = self.history()?;
        let fetched = self.fetched.borrow();

        Ok(ids
            .iter()
            .filter_map(|id| {
                history
                    .revision(id)
                    .map(|rev| rev.parents.clone())
                    .or_else(|| fetched.get(id).cloned())
                    .map(|parents| (id.clone(), parents))
            })
            .collect())
    }

    fn revision(&self, id: &RevisionId) -> Result<Revision> {
        self.history()?
            .revision(id)
            .cloned()
            .ok_or_else(|| Error::NoSuchRevision(id.to_string()))
    }

    fn revision_id_to_revno(&self, id: &RevisionId) -> RevnoLookup {
        match self.history() {
            Ok(history) => history
                .revno_of(id)
                .map_or(RevnoLookup::NotFound, RevnoLookup::Resolved),
            Err(e) => RevnoLookup::Transient(e.to_string()),
        }
    }

    fn merged_revisions(&self, revno: Revno) -> Result<Vec<RevisionId>> {
        let group = self.history()?.merged_group(revno);
        if group.is_empty() {
            return Err(Error::NoSuchRevno(revno));
        }
        Ok(group)
    }

    fn revision_delta(&self, revno: Revno) -> Result<RevisionDelta> {
        let range = format!("{}..{revno}", revno.saturating_sub(1));
        let args = ["status", "-S", "-r", range.as_str()];
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(Self::command_error(&args, &output));
        }
        Ok(parse_short_status(&String::from_utf8_lossy(&output.stdout)))
    }

    fn diff(&self, from: Revno, to: Revno, prefix: Option<&PathPrefix>) -> Result<Vec<u8>> {
        let range = format!("{from}..{to}");
        let prefix_arg = prefix.map(PathPrefix::as_arg);

        let mut args = vec!["diff", "-r", range.as_str()];
        if let Some(prefix_arg) = &prefix_arg {
            args.extend(["--prefix", prefix_arg.as_str()]);
        }

        let output = self.run(&args)?;
        // bzr diff exits 1 when there are differences
        match output.status.code() {
            Some(0 | 1) => Ok(output.stdout),
            _ => Err(Self::command_error(&args, &output)),
        }
    }
}

impl std::fmt::Debug for BzrBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BzrBranch")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
