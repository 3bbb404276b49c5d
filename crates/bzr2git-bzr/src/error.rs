//! Error types for bzr2git-bzr.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a Bazaar branch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No Bazaar branch at the given location.
    #[error("not a branch: {}", .0.display())]
    NotABranch(PathBuf),

    /// Revision id unknown to the branch.
    #[error("no such revision: {0}")]
    NoSuchRevision(String),

    /// Revno outside the branch's mainline.
    #[error("no such revno: {0}")]
    NoSuchRevno(u32),

    /// The `bzr` program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A `bzr` command exited with an error status.
    #[error("`bzr {command}` failed with status {code:?}: {stderr}")]
    Command {
        /// Subcommand and arguments.
        command: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// `bzr log` output could not be understood.
    #[error("malformed log output: {0}")]
    MalformedLog(String),

    /// Another process holds the branch lock.
    #[error("branch is locked by another process ({})", .0.display())]
    LockContention(PathBuf),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
