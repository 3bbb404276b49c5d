//! # bzr2git-core
//!
//! Core library for bzr2git.
//! Decides which Bazaar revisions are missing from the upstream branch,
//! orders them so parents come first, and replays each one onto the target
//! git working tree as a patch, rename and commit transaction.

pub mod author;
pub mod config;
pub mod difference;
pub mod engine;
pub mod error;
pub mod operator;
pub mod order;
pub mod project;
mod transaction;

#[cfg(test)]
mod test_mocks;

pub use author::{Author, ascii_name, commit_message, parse_author};
pub use config::Config;
pub use difference::{Difference, ancestry, find_difference};
pub use engine::{ReplayEngine, ReplayOptions, ReplaySummary, RevisionOutcome};
pub use error::{Error, Result};
pub use operator::{Announcement, ApplyFailure, Operator};
pub use order::{replay_order, topo_sort};
pub use project::{ProjectDescriptor, ProjectKind};
