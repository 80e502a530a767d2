//! Read-only inspection of the entry occupying a link path.
use std::path::{Path, PathBuf};

use crate::error::ReconcileError;
use crate::fs::{EntryKind, Filesystem};

/// What currently occupies a link path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing is there.
    Missing,
    /// A symbolic link storing `current` as its target.
    Symlink {
        /// Stored target, exactly as read from the link.
        current: PathBuf,
    },
    /// A directory with no entries.
    EmptyDirectory,
    /// A directory with at least one entry.
    Directory,
    /// A regular file or any other non-directory, non-symlink entry.
    File,
}

impl LinkState {
    /// Short human-readable name of the occupant.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Symlink { .. } => "symlink",
            Self::EmptyDirectory => "empty directory",
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

/// Classify the entry at `link` without following a final symlink.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] if the entry cannot be examined.
pub fn inspect(fs: &dyn Filesystem, link: &Path) -> Result<LinkState, ReconcileError> {
    let kind = fs
        .entry_kind(link)
        .map_err(ReconcileError::io("inspect", link))?;
    Ok(match kind {
        EntryKind::Missing => LinkState::Missing,
        EntryKind::Symlink => LinkState::Symlink {
            current: fs
                .read_link(link)
                .map_err(ReconcileError::io("read link", link))?,
        },
        EntryKind::Directory => {
            if fs
                .is_empty_dir(link)
                .map_err(ReconcileError::io("list directory", link))?
            {
                LinkState::EmptyDirectory
            } else {
                LinkState::Directory
            }
        }
        EntryKind::File => LinkState::File,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fs::LocalFilesystem;

    #[test]
    fn inspect_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = inspect(&LocalFilesystem, &dir.path().join("a/b")).unwrap();
        assert_eq!(state, LinkState::Missing);
    }

    #[test]
    fn inspect_directories_by_contents() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        assert_eq!(
            inspect(&LocalFilesystem, &sub).unwrap(),
            LinkState::EmptyDirectory
        );
        std::fs::write(sub.join("file"), "x").unwrap();
        assert_eq!(inspect(&LocalFilesystem, &sub).unwrap(), LinkState::Directory);
    }

    #[test]
    fn inspect_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "x").unwrap();
        assert_eq!(inspect(&LocalFilesystem, &file).unwrap(), LinkState::File);
    }

    #[cfg(unix)]
    #[test]
    fn inspect_symlink_reports_stored_target() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("../elsewhere", &link).unwrap();
        assert_eq!(
            inspect(&LocalFilesystem, &link).unwrap(),
            LinkState::Symlink {
                current: PathBuf::from("../elsewhere")
            }
        );
    }

    #[test]
    fn describe_names() {
        assert_eq!(LinkState::EmptyDirectory.describe(), "empty directory");
        assert_eq!(LinkState::File.describe(), "file");
        assert_eq!(
            LinkState::Symlink {
                current: PathBuf::from("x")
            }
            .describe(),
            "symlink"
        );
    }
}
