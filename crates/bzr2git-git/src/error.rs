//! Error types for bzr2git-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// The repository has no working directory.
    #[error("repository is bare - a working tree is required")]
    BareRepository,

    /// An external program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `git mv` refused a rename.
    #[error("rename {from} -> {to} failed: {message}")]
    RenameFailed {
        /// Source path.
        from: String,
        /// Destination path.
        to: String,
        /// Stderr of the failed command.
        message: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}
