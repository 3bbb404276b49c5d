//! # bzr2git-git
//!
//! Git side of the replay, built on git2-rs.
//! Provides the working-tree operations a replayed revision needs:
//! applying a patch, mirroring renames, staging, committing under a
//! forged author identity, and rolling the tree back after a failure.

mod error;
mod process;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use git2::Oid;
pub use process::{ExternalTools, PatchOutcome};
pub use repository::{CommitIdentity, Repository};
pub use traits::WorkTreeOps;
