// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository, a fluent builder for the
// entries that occupy it before a run, and a recording `Log` so each test can
// assert on reported progress without touching the user's cache directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use symlinks_cli::commands::apply;
use symlinks_cli::config::{self, DEFAULT_CONFIG_PATH, LinkSpec};
use symlinks_cli::fs::LocalFilesystem;
use symlinks_cli::logging::{LinkEntry, Log};
use symlinks_cli::reconcile::{ReconcileOpts, Reconciler};

/// An isolated test repository backed by a [`tempfile::TempDir`].
///
/// The root is canonicalized so comparisons against resolved link targets
/// are not defeated by a symlinked temp directory (e.g. `/tmp` on macOS).
pub struct TestRepo {
    dir: tempfile::TempDir,
    root: PathBuf,
}

impl TestRepo {
    /// Create an empty repository.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        Self { dir, root }
    }

    /// Path to the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the repository.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write the default JSON config.
    pub fn with_config(self, json: &str) -> Self {
        self.with_file(DEFAULT_CONFIG_PATH, json)
    }

    /// Create a directory (and its parents).
    pub fn with_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.path(relative)).expect("create dir");
        self
    }

    /// Write a file, creating its parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Create a symlink at `relative` storing `stored` verbatim.
    #[cfg(unix)]
    pub fn with_symlink(self, relative: &str, stored: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create link parent");
        }
        std::os::unix::fs::symlink(stored, &path).expect("create symlink");
        self
    }

    /// Load the default config.
    pub fn specs(&self) -> Vec<LinkSpec> {
        config::load(&self.path(DEFAULT_CONFIG_PATH)).expect("load config")
    }

    /// Reconcile the default config and return the run result with its log.
    pub fn apply(&self, opts: ReconcileOpts, keep_going: bool) -> (anyhow::Result<()>, RecordingLog) {
        let log = RecordingLog::default();
        let specs = self.specs();
        let reconciler = Reconciler::new(&self.root, &LocalFilesystem, &log, opts);
        let result = apply::reconcile_all(&reconciler, &specs, keep_going, &log);
        (result, log)
    }

    /// Stored target of the symlink at `relative`.
    pub fn read_link(&self, relative: &str) -> PathBuf {
        std::fs::read_link(self.path(relative)).expect("read link")
    }

    /// Whether anything (including a broken symlink) exists at `relative`.
    pub fn occupied(&self, relative: &str) -> bool {
        std::fs::symlink_metadata(self.path(relative)).is_ok()
    }

    /// Sorted listing of every entry under the root, with symlinks shown
    /// as `path -> stored`. Used to prove a run left the tree unchanged.
    pub fn tree(&self) -> Vec<String> {
        let mut out = Vec::new();
        walk(&self.root, &self.root, &mut out);
        out.sort();
        out
    }
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        let rel = path
            .strip_prefix(root)
            .expect("under root")
            .to_string_lossy()
            .replace('\\', "/");
        let meta = std::fs::symlink_metadata(&path).expect("metadata");
        if meta.file_type().is_symlink() {
            let stored = std::fs::read_link(&path).expect("read link");
            out.push(format!("{rel} -> {}", stored.display()));
        } else if meta.is_dir() {
            out.push(format!("{rel}/"));
            walk(root, &path, out);
        } else {
            out.push(rel);
        }
    }
}

/// A [`Log`] that keeps every message and entry in memory.
#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    entries: Mutex<Vec<LinkEntry>>,
}

impl RecordingLog {
    fn push(&self, kind: &str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(format!("[{kind}] {msg}"));
    }

    /// Every message logged, prefixed with its channel.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    /// Every recorded entry, in order.
    pub fn entries(&self) -> Vec<LinkEntry> {
        self.entries.lock().expect("entries lock").clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }

    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn debug(&self, _msg: &str) {}

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }

    fn dry_run(&self, msg: &str) {
        self.push("dry-run", msg);
    }

    fn record(&self, entry: LinkEntry) {
        self.entries.lock().expect("entries lock").push(entry);
    }
}
