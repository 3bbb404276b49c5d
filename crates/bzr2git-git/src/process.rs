//! External programs driven inside the target working tree.
//!
//! Patch application is left to the system `patch` utility and renames to
//! `git mv`, which handles directories and index bookkeeping in one call.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Names of the external programs used on the git side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTools {
    /// Program used to apply unified diffs.
    pub patch: String,
    /// Program used for `git mv`.
    pub git: String,
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self {
            patch: "patch".into(),
            git: "git".into(),
        }
    }
}

/// Result of running `patch` over a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Every hunk applied.
    Applied,
    /// At least one hunk was rejected or the patch could not be read.
    Failed {
        /// Exit code reported by `patch`, if it exited normally.
        exit_code: Option<i32>,
    },
}

impl PatchOutcome {
    /// Whether the patch applied cleanly.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Apply `diff` to `workdir` with `patch -p<strip> -f`.
///
/// Stdout is discarded; stderr goes to `rejects` so the caller can show
/// what went wrong.
pub(crate) fn apply_patch(
    tools: &ExternalTools,
    workdir: &Path,
    diff: &Path,
    strip: u8,
    rejects: &Path,
) -> Result<PatchOutcome> {
    tracing::debug!(diff = %diff.display(), strip, "applying patch");
    let input = File::open(diff)?;
    let errors = File::create(rejects)?;

    let status = Command::new(&tools.patch)
        .args([format!("-p{strip}").as_str(), "-f"])
        .current_dir(workdir)
        .stdin(Stdio::from(input))
        .stdout(Stdio::null())
        .stderr(Stdio::from(errors))
        .status()
        .map_err(|source| Error::Spawn {
            program: tools.patch.clone(),
            source,
        })?;

    if status.success() {
        Ok(PatchOutcome::Applied)
    } else {
        Ok(PatchOutcome::Failed {
            exit_code: status.code(),
        })
    }
}

/// Remove now-empty directories between `path` and `root`.
pub(crate) fn prune_empty_parents(path: &Path, root: &Path) {
    let mut dir = path.parent();
    while let Some(current) = dir {
        if current == root || !current.starts_with(root) {
            break;
        }
        // Stops at the first non-empty directory.
        if std::fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}

/// Rename a tracked path with `git mv`.
///
/// Missing parents of the destination are created first and removed again
/// if the rename fails. Directories the move leaves empty are pruned.
pub(crate) fn git_mv(tools: &ExternalTools, workdir: &Path, from: &str, to: &str) -> Result<()> {
    tracing::debug!(from, to, "git mv");
    let destination = workdir.join(to);
    let created_parents = match destination.parent() {
        Some(parent) if !parent.is_dir() => {
            std::fs::create_dir_all(parent)?;
            true
        }
        _ => false,
    };

    let output = Command::new(&tools.git)
        .args(["mv", "--", from, to])
        .current_dir(workdir)
        .output()
        .map_err(|source| Error::Spawn {
            program: tools.git.clone(),
            source,
        });

    match output {
        Ok(output) if output.status.success() => {
            prune_empty_parents(&workdir.join(from), workdir);
            Ok(())
        }
        failed => {
            if created_parents {
                prune_empty_parents(&destination, workdir);
            }
            let output = failed?;
            Err(Error::RenameFailed {
                from: from.to_string(),
                to: to.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
