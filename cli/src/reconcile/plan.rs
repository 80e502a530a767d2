//! Decide what to do about an occupied (or free) link path.
//!
//! Planning never touches the filesystem, so a dry run reaches exactly the
//! same decision as a real run.
use std::path::{Path, PathBuf};

use super::state::LinkState;
use crate::error::ReconcileError;

/// The mutation needed to make a link path hold the desired symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// The existing symlink already resolves to the target.
    Keep,
    /// Nothing is there; create the link.
    Create,
    /// Remove a symlink that points elsewhere, then create the link.
    ReplaceSymlink {
        /// Stored target of the symlink being replaced.
        previous: PathBuf,
    },
    /// Remove an empty directory, then create the link.
    ReplaceEmptyDirectory,
}

/// Choose a [`Plan`] for `state`.
///
/// `points_at_target` is asked only when the occupant is a symlink, with
/// the symlink's stored target. `link` is the link as declared and is used
/// for error messages.
///
/// # Errors
///
/// - [`ReconcileError::ConflictingSymlink`] for a foreign symlink without `force`
/// - [`ReconcileError::NonEmptyDirectory`] for a directory with contents
/// - [`ReconcileError::Occupied`] for a file, or an empty directory without `force`
pub fn plan<F>(
    state: LinkState,
    points_at_target: F,
    force: bool,
    link: &Path,
) -> Result<Plan, ReconcileError>
where
    F: FnOnce(&Path) -> bool,
{
    match state {
        LinkState::Missing => Ok(Plan::Create),
        LinkState::Symlink { current } => {
            if points_at_target(&current) {
                Ok(Plan::Keep)
            } else if force {
                Ok(Plan::ReplaceSymlink { previous: current })
            } else {
                Err(ReconcileError::ConflictingSymlink {
                    link: link.to_path_buf(),
                    current,
                })
            }
        }
        LinkState::EmptyDirectory if force => Ok(Plan::ReplaceEmptyDirectory),
        LinkState::Directory => Err(ReconcileError::NonEmptyDirectory {
            link: link.to_path_buf(),
        }),
        occupant @ (LinkState::EmptyDirectory | LinkState::File) => {
            Err(ReconcileError::Occupied {
                link: link.to_path_buf(),
                kind: occupant.describe(),
            })
        }
    }
}
