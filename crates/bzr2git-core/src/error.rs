//! Error types for bzr2git-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a replay run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source tree matches no known project layout.
    #[error("project in {} not recognized", .0.display())]
    UnrecognizedProject(PathBuf),

    /// The revision graph contains a cycle.
    #[error("cyclic ancestry detected at revision {0}")]
    CyclicAncestry(String),

    /// Revno lookups kept failing.
    #[error("could not resolve revno of {revision} after {attempts} attempts: {reason}")]
    LookupExhausted {
        /// Revision being resolved.
        revision: String,
        /// Attempts made.
        attempts: u32,
        /// Last failure reported by the branch.
        reason: String,
    },

    /// The operator prompt failed.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Config file parsing error.
    #[error("failed to parse {}: {message}", file.display())]
    ConfigParse { file: PathBuf, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Bazaar branch access error.
    #[error("bzr error: {0}")]
    Bzr(#[from] bzr2git_bzr::Error),

    /// Git operation error.
    #[error("git error: {0}")]
    Git(#[from] bzr2git_git::Error),
}
