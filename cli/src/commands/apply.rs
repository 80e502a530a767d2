use anyhow::{Context as _, Result};

use crate::cli::ApplyOpts;
use crate::config::{self, LinkSpec};
use crate::fs::LocalFilesystem;
use crate::logging::{LinkEntry, LinkStatus, Log, Logger};
use crate::paths;
use crate::reconcile::{Outcome, ReconcileOpts, Reconciler};

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved, the configuration
/// cannot be loaded, or any specification fails to reconcile.
pub fn run(opts: &ApplyOpts, log: &Logger) -> Result<()> {
    let root = super::resolve_root(opts.root.as_deref())?;
    log.debug(&format!("symlinks {}", crate::VERSION));
    log.debug(&format!("root: {}", root.display()));

    log.stage("Loading configuration");
    let config_path = paths::resolve_under(&root, &opts.config);
    let specs = config::load(&config_path).context("failed to load symlink configuration")?;
    if specs.is_empty() {
        log.info("No symlinks configured.");
        return Ok(());
    }
    log.info(&format!(
        "loaded {} symlinks from {}",
        specs.len(),
        config_path.display()
    ));

    log.stage(if opts.dry_run {
        "Previewing symlinks"
    } else {
        "Applying symlinks"
    });
    let reconciler = Reconciler::new(
        &root,
        &LocalFilesystem,
        log,
        ReconcileOpts {
            dry_run: opts.dry_run,
            force: opts.force,
        },
    );
    let result = reconcile_all(&reconciler, &specs, opts.keep_going, log);

    log.print_summary();
    result
}

/// Reconcile `specs` in declaration order, recording one entry per
/// processed specification.
///
/// Without `keep_going` the first failure stops the run. With it, every
/// specification is attempted and the failures are counted at the end.
///
/// # Errors
///
/// Each failure is logged as it happens. The returned error only names
/// the first failed link, or counts the failures when `keep_going` is set.
pub fn reconcile_all(
    reconciler: &Reconciler<'_>,
    specs: &[LinkSpec],
    keep_going: bool,
    log: &dyn Log,
) -> Result<()> {
    let mut failed = 0usize;
    for spec in specs {
        match reconciler.reconcile(spec) {
            Ok(outcome) => log.record(entry_for(spec, &outcome)),
            Err(e) => {
                log.error(&format!("{}: {e}", spec.platform));
                log.record(LinkEntry {
                    link: spec.link.display().to_string(),
                    platform: spec.platform.clone(),
                    status: LinkStatus::Failed,
                    message: Some(e.to_string()),
                });
                if !keep_going {
                    anyhow::bail!("failed to link '{}'", spec.link.display());
                }
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} symlink(s) failed");
    }
    Ok(())
}

/// Summary entry for a successfully reconciled specification.
fn entry_for(spec: &LinkSpec, outcome: &Outcome) -> LinkEntry {
    let (status, message) = match outcome {
        Outcome::Disabled => (LinkStatus::Skipped, Some("disabled".to_string())),
        Outcome::AlreadySatisfied | Outcome::AlreadyLinked => (LinkStatus::Unchanged, None),
        Outcome::Created { relative, dry_run } => (
            change_status(*dry_run),
            Some(format!("-> {}", relative.display())),
        ),
        Outcome::Replaced {
            previous,
            relative,
            dry_run,
        } => (
            change_status(*dry_run),
            Some(format!("-> {}, replaced {previous}", relative.display())),
        ),
    };
    LinkEntry {
        link: spec.link.display().to_string(),
        platform: spec.platform.clone(),
        status,
        message,
    }
}

const fn change_status(dry_run: bool) -> LinkStatus {
    if dry_run {
        LinkStatus::DryRun
    } else {
        LinkStatus::Changed
    }
}
