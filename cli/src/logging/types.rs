//! Core logging types: per-link entries, status, and the [`Log`] trait.

/// Reconciliation result of one link specification, kept for the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Link path as declared in the configuration.
    pub link: String,
    /// Platform group the specification came from.
    pub platform: String,
    /// Final status of the specification.
    pub status: LinkStatus,
    /// Optional detail (e.g. the replaced entry or the failure reason).
    pub message: Option<String>,
}

/// Status of a reconciled link specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// A link was created or replaced.
    Changed,
    /// The link already satisfied its specification.
    Unchanged,
    /// The specification is disabled.
    Skipped,
    /// Dry run: a change was computed but not applied.
    DryRun,
    /// Reconciliation failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests can
/// substitute a recording implementation to assert on reported intent.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a link result for the summary.
    fn record(&self, entry: LinkEntry);
}
