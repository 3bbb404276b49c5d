//! # bzr2git-bzr
//!
//! Read access to Bazaar branches for bzr2git.
//! Everything goes through the `bzr` program: the ancestry graph and
//! revision metadata come from `bzr log --long --show-ids -n0`, deltas from
//! `bzr status -S` and single-revision diffs from `bzr diff`.

mod branch;
mod error;
mod history;
mod lock;
mod log;
mod revision;
mod status;
mod traits;

pub use branch::BzrBranch;
pub use error::{Error, Result};
pub use history::History;
pub use lock::WriteLock;
pub use log::{LogEntry, parse_long_log};
pub use revision::{
    ParentMap, PathPrefix, Rename, Revision, RevisionDelta, RevisionId, Revno, RevnoLookup,
};
pub use status::parse_short_status;
pub use traits::BranchOps;
