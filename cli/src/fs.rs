//! Filesystem port used by the reconciler.
//!
//! The reconciler only needs a handful of syscalls. Routing them through
//! [`Filesystem`] keeps the root and the filesystem explicit values, so the
//! decision logic can be exercised against a mock as well as a sandbox.
use std::io;
use std::path::{Path, PathBuf};

/// What occupies a path, without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing exists at the path (not even a broken symlink).
    Missing,
    /// A symbolic link, whether or not its target exists.
    Symlink,
    /// A real directory.
    Directory,
    /// Anything else: regular files, sockets, devices.
    File,
}

/// The filesystem operations the reconciler performs.
pub trait Filesystem {
    /// Resolve `path` to its absolute, symlink-free form. Fails when the
    /// path does not exist.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Classify the entry at `path` without following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read for a reason other than
    /// the path not existing.
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Read the stored target of the symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Whether the directory at `path` has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove the symlink at `path` (not what it points to).
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn remove_symlink(&self, path: &Path) -> io::Result<()>;

    /// Remove the empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, including when the directory is not
    /// empty.
    fn remove_empty_dir(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` storing `stored` as its target.
    ///
    /// `resolved` is the absolute location `stored` denotes; Windows needs
    /// it to pick between file and directory links.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn create_symlink(&self, stored: &Path, resolved: &Path, link: &Path) -> io::Result<()>;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(EntryKind::Symlink),
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(e) => Err(e),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_symlink(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    #[cfg(unix)]
    fn create_symlink(&self, stored: &Path, _resolved: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(stored, link)
    }

    #[cfg(windows)]
    fn create_symlink(&self, stored: &Path, resolved: &Path, link: &Path) -> io::Result<()> {
        if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(stored, link)
        } else {
            std::os::windows::fs::symlink_file(stored, link)
        }
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
