//! Write lock on a branch, held for the duration of a graph query.

use std::cell::Cell;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{Error, Result};

/// RAII write lock.
///
/// Locks are reentrant per branch handle: nested acquisitions share the
/// lock file, which is removed when the outermost guard drops.
#[derive(Debug)]
pub struct WriteLock {
    file: Option<PathBuf>,
    holders: Rc<Cell<usize>>,
}

impl WriteLock {
    /// Acquire the lock, creating `file` if this is the first holder.
    ///
    /// With `file` set to `None` only the holder count is tracked.
    ///
    /// # Errors
    /// Returns [`Error::LockContention`] if another process holds the lock
    /// file, or an IO error if it cannot be created.
    pub fn acquire(file: Option<PathBuf>, holders: &Rc<Cell<usize>>) -> Result<Self> {
        if holders.get() == 0 {
            if let Some(path) = &file {
                match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(_) => {}
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        return Err(Error::LockContention(path.clone()));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        holders.set(holders.get() + 1);
        tracing::trace!(holders = holders.get(), "write lock acquired");

        Ok(Self {
            file,
            holders: Rc::clone(holders),
        })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let remaining = self.holders.get().saturating_sub(1);
        self.holders.set(remaining);
        if remaining == 0 {
            if let Some(path) = &self.file {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove lock file");
                }
            }
        }
        tracing::trace!(holders = remaining, "write lock released");
    }
}
