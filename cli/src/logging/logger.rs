//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, LinkEntry, LinkStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record` method is **not** included because its signature differs
/// from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Per-status totals over the recorded link entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    /// Links created or replaced.
    pub changed: u32,
    /// Links already correct.
    pub unchanged: u32,
    /// Disabled specifications.
    pub skipped: u32,
    /// Changes previewed under dry run.
    pub dry_run: u32,
    /// Failed specifications.
    pub failed: u32,
}

impl SummaryCounts {
    /// Total number of recorded specifications.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.changed + self.unchanged + self.skipped + self.dry_run + self.failed
    }
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/symlinks/<command>.log` (default `~/.cache/symlinks/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<LinkEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LinkEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file via the [`FileLayer`](super::subscriber::FileLayer)).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a link result for the summary.
    pub fn record(&self, entry: LinkEntry) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry);
        }
    }

    /// Totals per status over everything recorded so far.
    #[must_use]
    pub fn counts(&self) -> SummaryCounts {
        let mut counts = SummaryCounts::default();
        for entry in &self.entries() {
            match entry.status {
                LinkStatus::Changed => counts.changed += 1,
                LinkStatus::Unchanged => counts.unchanged += 1,
                LinkStatus::Skipped => counts.skipped += 1,
                LinkStatus::DryRun => counts.dry_run += 1,
                LinkStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Print the summary of all recorded links.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        for entry in &entries {
            let (icon, color) = match entry.status {
                LinkStatus::Changed => ("✓", "\x1b[32m"),
                LinkStatus::Unchanged => ("·", "\x1b[2m"),
                LinkStatus::Skipped => ("○", "\x1b[33m"),
                LinkStatus::DryRun => ("~", "\x1b[37m"),
                LinkStatus::Failed => ("✗", "\x1b[31m"),
            };

            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!(
                "{color}{icon} {}: {}{suffix}\x1b[0m",
                entry.platform, entry.link
            ));
        }

        println!();
        let c = self.counts();
        self.info(&format!(
            "{} links: \x1b[32m{} changed\x1b[0m, \x1b[2m{} unchanged\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            c.total(),
            c.changed,
            c.unchanged,
            c.skipped,
            c.dry_run,
            c.failed
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record(&self, entry: LinkEntry) {
        self.record(entry);
    }
}
