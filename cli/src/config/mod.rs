//! Link specification loading.
//!
//! The configuration is a sequence of platform groups, each holding an
//! ordered list of symlink entries. Groups are flattened into one ordered
//! sequence of [`LinkSpec`]s; the platform label rides along as metadata and
//! never changes how a specification is processed.
mod walker;

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;

/// Configuration location, relative to the repository root, used when none
/// is given. Its presence also marks a directory as a repository root.
pub const DEFAULT_CONFIG_PATH: &str = "scripts/platform_paths.json";

/// One declared symlink: `link` should resolve to `target`, both relative
/// to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Entry that should become (or remain) a symbolic link.
    pub link: PathBuf,
    /// What `link` should point to. `.` for disabled placeholders.
    pub target: PathBuf,
    /// Label of the platform group the entry came from.
    pub platform: String,
    /// Disabled specifications are reported but never touch the filesystem.
    pub enabled: bool,
}

/// On-disk configuration syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// A JSON array of platform groups.
    Json,
    /// A TOML document with a `platforms` array of tables.
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `.toml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// Load link specifications from the file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist, and any
/// read, syntax, or structural error otherwise.
pub fn load(path: &Path) -> Result<Vec<LinkSpec>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, ConfigFormat::from_path(path))
}

/// Parse link specifications from `content`.
///
/// # Errors
///
/// Returns [`ConfigError::Syntax`] for malformed input and a structural
/// [`ConfigError`] naming the offending platform group otherwise.
pub fn parse(content: &str, format: ConfigFormat) -> Result<Vec<LinkSpec>, ConfigError> {
    let raw = match format {
        ConfigFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| {
            ConfigError::Syntax {
                format,
                message: e.to_string(),
            }
        })?,
        ConfigFormat::Toml => toml_groups(content)?,
    };
    walker::specs_from_value(&raw)
}

/// Read a TOML document and return its `platforms` array as a JSON value so
/// both formats share one validator. A document without `platforms` declares
/// nothing.
fn toml_groups(content: &str) -> Result<Value, ConfigError> {
    let syntax = |message: String| ConfigError::Syntax {
        format: ConfigFormat::Toml,
        message,
    };
    let mut table: toml::Table = toml::from_str(content).map_err(|e| syntax(e.to_string()))?;
    match table.remove("platforms") {
        Some(groups) => serde_json::to_value(groups).map_err(|e| syntax(e.to_string())),
        None => Ok(Value::Array(Vec::new())),
    }
}
