//! Per-specification link reconciliation.
//!
//! Each [`LinkSpec`] goes through three stages: [`state::inspect`] reads
//! what occupies the link path, [`plan::plan`] decides what to do about it,
//! and [`Reconciler`] applies the decision unless running dry.
pub mod plan;
pub mod state;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LinkSpec;
use crate::error::ReconcileError;
use crate::fs::Filesystem;
use crate::logging::Log;
use crate::paths;

pub use plan::Plan;
pub use state::LinkState;

/// Modifiers applied to every specification in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOpts {
    /// Compute and report every decision without mutating the filesystem.
    pub dry_run: bool,
    /// Replace symlinks pointing elsewhere and empty directories.
    pub force: bool,
}

/// What a replaced link path held before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replaced {
    /// A symlink storing the given target.
    Symlink(PathBuf),
    /// An empty directory.
    EmptyDirectory,
}

impl fmt::Display for Replaced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symlink(previous) => write!(f, "symlink -> {}", previous.display()),
            Self::EmptyDirectory => write!(f, "empty directory"),
        }
    }
}

/// Result of reconciling one specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The specification is disabled; nothing was resolved.
    Disabled,
    /// The link location already is the target.
    AlreadySatisfied,
    /// An existing symlink already points at the target.
    AlreadyLinked,
    /// A link storing `relative` was created.
    Created {
        /// Stored target of the new link.
        relative: PathBuf,
        /// The link was only planned, not created.
        dry_run: bool,
    },
    /// The previous occupant was removed and a link storing `relative`
    /// created in its place.
    Replaced {
        /// What was removed.
        previous: Replaced,
        /// Stored target of the new link.
        relative: PathBuf,
        /// The replacement was only planned, not performed.
        dry_run: bool,
    },
}

impl Outcome {
    /// Whether the outcome was computed without applying it.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        matches!(
            self,
            Self::Created { dry_run: true, .. } | Self::Replaced { dry_run: true, .. }
        )
    }
}

/// Drives a filesystem towards a set of link specifications under one root.
pub struct Reconciler<'a> {
    root: &'a Path,
    fs: &'a dyn Filesystem,
    log: &'a dyn Log,
    opts: ReconcileOpts,
}

impl fmt::Debug for Reconciler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("root", &self.root)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for the absolute, existing directory `root`.
    #[must_use]
    pub fn new(
        root: &'a Path,
        fs: &'a dyn Filesystem,
        log: &'a dyn Log,
        opts: ReconcileOpts,
    ) -> Self {
        Self {
            root,
            fs,
            log,
            opts,
        }
    }

    /// Make `spec.link` a symlink resolving to `spec.target`.
    ///
    /// Progress is reported through the logger; failures are returned and
    /// left for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns a [`ReconcileError`] if the link path is occupied by
    /// something that may not be replaced under the current options, or if
    /// a filesystem call fails.
    pub fn reconcile(&self, spec: &LinkSpec) -> Result<Outcome, ReconcileError> {
        let platform = &spec.platform;
        let link_display = spec.link.display();
        let target_display = spec.target.display();

        if !spec.enabled {
            self.log.info(&format!(
                "{platform}: skipping disabled mapping '{link_display}'"
            ));
            return Ok(Outcome::Disabled);
        }

        let link = self.resolve_link_path(&spec.link);
        let target = self.resolve_target_path(&spec.target);
        self.log.debug(&format!(
            "{platform}: {} -> {}",
            link.display(),
            target.display()
        ));

        if self.same_location(&link, &target) {
            self.log.info(&format!(
                "{platform}: '{link_display}' already equals '{target_display}'"
            ));
            return Ok(Outcome::AlreadySatisfied);
        }

        let link_parent = link.parent().unwrap_or(self.root).to_path_buf();
        if !self.opts.dry_run {
            self.fs
                .create_dir_all(&link_parent)
                .map_err(ReconcileError::io("create directory", &link_parent))?;
        }

        let occupant = state::inspect(self.fs, &link)?;
        let decision = plan::plan(
            occupant,
            |current| self.same_location(&self.resolve(&link_parent.join(current)), &target),
            self.opts.force,
            &spec.link,
        )?;

        let relative = paths::relative_to(&link_parent, &target);
        let rel_display = relative.display();
        let outcome = match decision {
            Plan::Keep => {
                self.log.info(&format!(
                    "{platform}: '{link_display}' already links to '{target_display}'"
                ));
                return Ok(Outcome::AlreadyLinked);
            }
            Plan::Create => {
                self.report(&format!("link {platform}: '{link_display}' -> '{rel_display}'"));
                Outcome::Created {
                    relative: relative.clone(),
                    dry_run: self.opts.dry_run,
                }
            }
            Plan::ReplaceSymlink { previous } => {
                self.report(&format!(
                    "replace symlink {platform}: '{link_display}' (was -> {}) -> '{rel_display}'",
                    previous.display()
                ));
                if !self.opts.dry_run {
                    self.fs
                        .remove_symlink(&link)
                        .map_err(ReconcileError::io("remove symlink", &link))?;
                }
                Outcome::Replaced {
                    previous: Replaced::Symlink(previous),
                    relative: relative.clone(),
                    dry_run: self.opts.dry_run,
                }
            }
            Plan::ReplaceEmptyDirectory => {
                self.report(&format!(
                    "replace empty directory {platform}: '{link_display}' -> '{rel_display}'"
                ));
                if !self.opts.dry_run {
                    self.fs
                        .remove_empty_dir(&link)
                        .map_err(ReconcileError::io("remove directory", &link))?;
                }
                Outcome::Replaced {
                    previous: Replaced::EmptyDirectory,
                    relative: relative.clone(),
                    dry_run: self.opts.dry_run,
                }
            }
        };

        if !self.opts.dry_run {
            self.fs
                .create_symlink(&relative, &target, &link)
                .map_err(ReconcileError::io("create link", &link))?;
        }
        Ok(outcome)
    }

    /// Report an intended mutation, as a dry-run line when not applying.
    fn report(&self, action: &str) {
        if self.opts.dry_run {
            self.log.dry_run(&format!("would {action}"));
        } else {
            self.log.info(action);
        }
    }

    /// Existence-tolerant equality, consulting this reconciler's filesystem.
    fn same_location(&self, a: &Path, b: &Path) -> bool {
        paths::same_location_with(a, b, |p| self.fs.canonicalize(p))
    }

    /// Physical location of `path`, following whatever part of it exists.
    fn resolve(&self, path: &Path) -> PathBuf {
        paths::resolve_existing_with(path, |p| self.fs.canonicalize(p))
    }

    /// Absolute location of the link entry itself.
    ///
    /// The parent is resolved physically so the relative target is computed
    /// from the directory the link will actually live in; the final
    /// component is kept as-is so a symlink already sitting there is
    /// inspected, not followed.
    fn resolve_link_path(&self, link: &Path) -> PathBuf {
        let joined = self.root.join(link);
        match (joined.parent(), joined.file_name()) {
            (Some(parent), Some(name)) => self.resolve(parent).join(name),
            _ => self.resolve(&joined),
        }
    }

    /// Absolute location of the target, resolved physically as far as it
    /// exists.
    fn resolve_target_path(&self, target: &Path) -> PathBuf {
        self.resolve(&self.root.join(target))
    }
}
