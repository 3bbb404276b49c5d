//! Repository wrapper providing the working-tree operations of a replay.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{ErrorCode, IndexAddOption, Oid, Signature, StatusOptions, Time};

use crate::error::{Error, Result};
use crate::process::{self, ExternalTools, PatchOutcome, prune_empty_parents};

/// Author identity forged onto a replayed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    /// Author name (already ASCII-safe).
    pub name: String,
    /// Author e-mail.
    pub email: String,
    /// Authored date, second precision.
    pub when: DateTime<Utc>,
}

impl CommitIdentity {
    /// Build the git signature for this identity, in UTC.
    ///
    /// # Errors
    /// Returns error if git2 rejects the name or e-mail.
    pub fn signature(&self) -> Result<Signature<'static>> {
        let time = Time::new(self.when.timestamp(), 0);
        Ok(Signature::new(&self.name, &self.email, &time)?)
    }
}

/// High-level wrapper around the target git repository.
pub struct Repository {
    inner: git2::Repository,
    tools: ExternalTools,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = git2::Repository::discover(path)
            .map_err(|_| Error::NotARepository(path.display().to_string()))?;
        Ok(Self {
            inner,
            tools: ExternalTools::default(),
        })
    }

    /// Use the given external programs for patching and renaming.
    #[must_use]
    pub fn with_tools(mut self, tools: ExternalTools) -> Self {
        self.tools = tools;
        self
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    fn require_workdir(&self) -> Result<&Path> {
        self.workdir().ok_or(Error::BareRepository)
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    // === Working directory state ===

    /// Check if the working directory is clean.
    ///
    /// # Errors
    /// Returns error if status check fails.
    pub fn is_clean(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        let statuses = self.inner.statuses(Some(&mut opts))?;
        Ok(statuses.is_empty())
    }

    /// Apply a unified diff to the working tree.
    ///
    /// # Errors
    /// Returns error if the diff cannot be read or `patch` cannot be started.
    /// A patch that runs but rejects hunks is reported through
    /// [`PatchOutcome::Failed`], not as an error.
    pub fn apply_patch(&self, diff: &Path, strip: u8, rejects: &Path) -> Result<PatchOutcome> {
        let workdir = self.require_workdir()?;
        process::apply_patch(&self.tools, workdir, diff, strip, rejects)
    }

    /// Rename a tracked path, keeping the index in step.
    ///
    /// # Errors
    /// Returns error if `git mv` fails.
    pub fn rename_path(&self, from: &str, to: &str) -> Result<()> {
        let workdir = self.require_workdir()?;
        process::git_mv(&self.tools, workdir, from, to)
    }

    /// Stage every change in the working tree, deletions included.
    ///
    /// # Errors
    /// Returns error if the index cannot be updated.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.inner.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;
        Ok(())
    }

    // === Commit operations ===

    /// Get the commit HEAD points at, if any.
    ///
    /// # Errors
    /// Returns error if HEAD cannot be read.
    pub fn head_commit(&self) -> Result<Option<Oid>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a commit by its SHA.
    ///
    /// # Errors
    /// Returns error if commit not found.
    pub fn find_commit(&self, oid: Oid) -> Result<git2::Commit<'_>> {
        Ok(self.inner.find_commit(oid)?)
    }

    /// Commit the index on top of HEAD with the given author.
    ///
    /// The committer is the repository's configured identity, or the author
    /// when none is configured.
    ///
    /// # Errors
    /// Returns error if the tree or commit cannot be written.
    pub fn commit_as(&self, identity: &CommitIdentity, message: &str) -> Result<Oid> {
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let author = identity.signature()?;
        let committer = match self.inner.signature() {
            Ok(sig) => sig.to_owned(),
            Err(_) => author.clone(),
        };

        let parent = match self.head_commit()? {
            Some(oid) => Some(self.inner.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &author, &committer, message, &tree, &parents)?;
        Ok(oid)
    }

    // === Reset operations ===

    /// Discard all uncommitted changes to tracked files.
    ///
    /// On an unborn branch the index is emptied instead.
    ///
    /// # Errors
    /// Returns error if reset fails.
    pub fn reset_hard(&self) -> Result<()> {
        match self.head_commit()? {
            Some(oid) => {
                let commit = self.inner.find_commit(oid)?;
                self.inner
                    .reset(commit.as_object(), git2::ResetType::Hard, None)?;
            }
            None => {
                let mut index = self.inner.index()?;
                index.clear()?;
                index.write()?;
            }
        }
        Ok(())
    }

    /// Delete untracked (non-ignored) files and the directories they leave
    /// empty. Returns the number of files removed.
    ///
    /// # Errors
    /// Returns error if status listing or removal fails.
    pub fn clean_untracked(&self) -> Result<usize> {
        let workdir = self.require_workdir()?.to_path_buf();

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let untracked: Vec<PathBuf> = self
            .inner
            .statuses(Some(&mut opts))?
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .filter_map(|entry| entry.path().map(|p| workdir.join(p)))
            .collect();

        for path in &untracked {
            std::fs::remove_file(path)?;
            prune_empty_parents(path, &workdir);
        }

        Ok(untracked.len())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish_non_exhaustive()
    }
}
