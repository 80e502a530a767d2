pub mod apply;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::DEFAULT_CONFIG_PATH;

/// Resolve the repository root from an explicit override or auto-detection.
///
/// Without an override, the root is the nearest ancestor of the running
/// binary's directory that holds the default config, then the current
/// directory if it holds one. The result is canonical.
///
/// # Errors
///
/// Returns an error if no root can be determined, or if the chosen root
/// does not exist or is not a directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(root) => root.to_path_buf(),
        None => detect_root()?,
    };
    let canonical = dunce::canonicalize(&root)
        .with_context(|| format!("cannot resolve repository root {}", root.display()))?;
    if !canonical.is_dir() {
        anyhow::bail!("repository root is not a directory: {}", canonical.display());
    }
    Ok(canonical)
}

fn detect_root() -> Result<PathBuf> {
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
        && let Some(root) = find_marked_ancestor(parent)
    {
        return Ok(root);
    }

    // Last resort: current directory
    let cwd = std::env::current_dir()?;
    if cwd.join(DEFAULT_CONFIG_PATH).is_file() {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine repository root. Use --root or set SYMLINKS_ROOT env var");
}

/// Nearest ancestor of `start` (inclusive) that holds the default config.
fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DEFAULT_CONFIG_PATH).is_file())
        .map(Path::to_path_buf)
}
