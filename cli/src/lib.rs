//! Declarative reconciler for repository-local symlinks.
//!
//! A configuration file lists, per platform group, which paths inside a
//! repository should be symbolic links and what they should point to. Each
//! run drives the working tree towards that description: missing links are
//! created as relative links, correct ones are left alone, and anything
//! else is refused unless `--force` allows replacing it.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: load and validate link specifications (JSON or TOML)
//! - **[`paths`]**: lexical normalization, relative retargeting, location equality
//! - **[`fs`]**: the filesystem port the reconciler acts through
//! - **[`reconcile`]**: inspect, plan, and apply one specification at a time
//! - **[`commands`]**: root detection and the end-to-end apply run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod paths;
pub mod reconcile;

/// Version string reported by `--version` and the log file header.
///
/// Release builds set `SYMLINKS_VERSION`; otherwise `build.rs` fills it from
/// `git describe`, falling back to the package version.
pub const VERSION: &str = match option_env!("SYMLINKS_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
