//! Move or link files into their sorted location
use crate::error::{Error, Result};
use std::path::Path;

/// How a file reaches its new path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// Leave the file in place, create a symbolic link to it
    Symlink,
    /// Rename the file
    Move,
}

impl Default for Relocation {
    fn default() -> Self {
        Relocation::Symlink
    }
}

impl Relocation {
    /// Relocate `src` to `dst`
    ///
    /// Links point to the absolute path of `src`.
    ///
    /// # Errors
    /// When `dst` exists or the filesystem operation fails.
    pub fn apply(self, src: &Path, dst: &Path) -> Result<()> {
        match self {
            Relocation::Symlink => {
                let target = std::fs::canonicalize(src).map_err(Error::io(src))?;
                symlink(&target, dst).map_err(Error::io(dst))
            }
            Relocation::Move => std::fs::rename(src, dst).map_err(Error::io(src)),
        }
    }

    /// Verb for log messages
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Relocation::Symlink => "symlinking",
            Relocation::Move => "moving",
        }
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
