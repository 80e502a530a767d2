//! Domain-specific error types for the symlink reconciler.
//!
//! Library modules return typed errors ([`ConfigError`], [`ReconcileError`]);
//! the command layer converts them to [`anyhow::Error`] via the standard `?`
//! operator and adds file or specification context there.
//!
//! # Error taxonomy
//!
//! ```text
//! ConfigError     : missing, unreadable, or structurally invalid configuration
//! ReconcileError  : a link path that cannot be safely reconciled, or a
//!                   filesystem call that failed mid-reconciliation
//! ```
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigFormat;

/// Errors that arise while locating, reading, or validating configuration.
///
/// Loading is all-or-nothing: any of these aborts the run before a single
/// filesystem mutation is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config not found: {}", .path.display())]
    NotFound {
        /// Location that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not syntactically valid for its format.
    #[error("Invalid {format} syntax: {message}")]
    Syntax {
        /// Format the file was parsed as.
        format: ConfigFormat,
        /// Parser error message.
        message: String,
    },

    /// The top level is not a sequence of platform groups.
    #[error("Config must be an array of platform groups.")]
    NotAnArray,

    /// A platform group is not an object.
    #[error("Each platform entry must be an object.")]
    GroupNotObject,

    /// A platform group's `symlinks` value is not an array.
    #[error("`symlinks` must be an array for platform '{platform}'.")]
    SymlinksNotArray {
        /// Label of the offending platform group.
        platform: String,
    },

    /// A symlink entry is not an object.
    #[error("Each symlink must be an object for platform '{platform}'.")]
    EntryNotObject {
        /// Label of the offending platform group.
        platform: String,
    },

    /// A disabled entry has no `link`.
    #[error("Disabled symlink entry is missing `link` for platform '{platform}'.")]
    DisabledMissingLink {
        /// Label of the offending platform group.
        platform: String,
    },

    /// An enabled entry lacks `link` or `target`.
    #[error("Missing `link` or `target` for platform '{platform}'.")]
    MissingLinkOrTarget {
        /// Label of the offending platform group.
        platform: String,
    },

    /// A recognized entry field holds a value of the wrong type.
    #[error("Invalid symlink entry for platform '{platform}': {message}")]
    InvalidEntry {
        /// Label of the offending platform group.
        platform: String,
        /// Deserializer message describing the mismatch.
        message: String,
    },
}

/// Errors that abort reconciliation of a single link specification.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The link path holds a symlink to somewhere else and `force` is off.
    #[error(
        "Refusing to replace symlink '{}' (currently -> {}). Re-run with --force to replace.",
        .link.display(),
        .current.display()
    )]
    ConflictingSymlink {
        /// Link path as declared in the configuration.
        link: PathBuf,
        /// Stored target of the existing symlink.
        current: PathBuf,
    },

    /// The link path holds an entry that cannot be replaced under the
    /// current modifiers (a file, or an empty directory without `force`).
    #[error(
        "Refusing to overwrite non-symlink path '{}' ({kind}). Move it out of the way manually (or use --force only for empty directories).",
        .link.display()
    )]
    Occupied {
        /// Link path as declared in the configuration.
        link: PathBuf,
        /// What occupies it.
        kind: &'static str,
    },

    /// The link path is a directory with contents. Never bypassed by `force`.
    #[error(
        "Refusing to overwrite non-empty directory '{}'. Move it out of the way manually.",
        .link.display()
    )]
    NonEmptyDirectory {
        /// Link path as declared in the configuration.
        link: PathBuf,
    },

    /// A filesystem call failed.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        /// Short description of the operation (e.g. `"create link"`).
        op: &'static str,
        /// Path the operation acted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl ReconcileError {
    /// Build a closure that wraps an [`io::Error`] for `op` on `path`, for
    /// use with [`Result::map_err`].
    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io { op, path, source }
    }
}
