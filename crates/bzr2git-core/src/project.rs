//! Project layout detection.
//!
//! Only two source layouts are known. Anything else is rejected rather
//! than guessed at, since a wrong prefix would misplace every patch.

use std::fmt;
use std::path::Path;

use bzr2git_bzr::PathPrefix;

use crate::error::{Error, Result};

/// Directory that marks an addons branch.
const ADDONS_MARKER: &str = "account_voucher";
/// Directories that mark a server branch (7.0 and 6.x layouts).
const SERVER_MARKERS: [&str; 2] = ["openerp/tools", "bin/tools"];
/// Where addons live inside the target repository.
const ADDONS_DIR: &str = "addons/";

/// Known source project shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Addons branch, checked out into `addons/` of the target.
    Addons,
    /// Server branch, mirrored at the target root.
    Server,
}

impl ProjectKind {
    /// Launchpad project name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Addons => "openupgrade-addons",
            Self::Server => "openupgrade-server",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Project kind plus the diff prefix rule it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Detected project.
    pub kind: ProjectKind,
    /// Diff label rewrite, if any.
    pub prefix: Option<PathPrefix>,
}

impl ProjectDescriptor {
    /// Classify the working tree at `path`.
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedProject`] for any other layout.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.join(ADDONS_MARKER).is_dir() {
            return Ok(Self {
                kind: ProjectKind::Addons,
                prefix: Some(PathPrefix::same(ADDONS_DIR)),
            });
        }

        if SERVER_MARKERS.iter().any(|marker| path.join(marker).is_dir()) {
            return Ok(Self {
                kind: ProjectKind::Server,
                prefix: None,
            });
        }

        Err(Error::UnrecognizedProject(path.to_path_buf()))
    }

    /// Strip level for `patch`.
    ///
    /// Prefixed diffs already carry target-relative paths; unprefixed ones
    /// use bzr's `old/` and `new/` labels.
    #[must_use]
    pub const fn patch_strip(&self) -> u8 {
        if self.prefix.is_some() { 0 } else { 1 }
    }

    /// Where a branch-relative path lives in the target working tree.
    #[must_use]
    pub fn target_path(&self, path: &str) -> String {
        self.prefix
            .as_ref()
            .map_or_else(|| path.to_string(), |prefix| prefix.apply(path))
    }
}
