use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

/// Top-level CLI entry point for the symlink reconciler.
#[derive(Parser, Debug)]
#[command(
    name = "symlinks",
    about = "Apply repository-local symlinks from a declarative config",
    version = crate::VERSION
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub apply: ApplyOpts,
}

/// Options controlling a reconciliation run.
#[derive(Parser, Debug, Clone)]
pub struct ApplyOpts {
    /// Path to the config file, relative to the root unless absolute
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override repository root directory
    #[arg(long, env = "SYMLINKS_ROOT")]
    pub root: Option<PathBuf>,

    /// Preview changes without modifying the filesystem
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Replace symlinks that point elsewhere and empty directories
    #[arg(short, long)]
    pub force: bool,

    /// Continue past failures and report them at the end
    #[arg(short, long)]
    pub keep_going: bool,
}
