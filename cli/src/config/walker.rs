//! Structural validation of the parsed configuration tree.
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use super::LinkSpec;
use crate::error::ConfigError;

/// Label used when a group has no usable `platform`.
const UNKNOWN_PLATFORM: &str = "unknown";

/// One platform group. Both fields are checked by hand so that an error can
/// name the platform even when `symlinks` is malformed.
#[derive(Debug, Deserialize)]
struct RawGroup {
    platform: Option<Value>,
    symlinks: Option<Value>,
}

/// One symlink entry as written. `null` reads as absent.
#[derive(Debug, Deserialize)]
struct RawEntry {
    link: Option<String>,
    target: Option<String>,
    enabled: Option<bool>,
}

/// Flatten platform groups into specifications, in declaration order.
pub(super) fn specs_from_value(raw: &Value) -> Result<Vec<LinkSpec>, ConfigError> {
    let groups = raw.as_array().ok_or(ConfigError::NotAnArray)?;

    let mut specs = Vec::new();
    for group in groups {
        if !group.is_object() {
            return Err(ConfigError::GroupNotObject);
        }
        let group = RawGroup::deserialize(group).map_err(|_| ConfigError::GroupNotObject)?;
        let platform = platform_label(group.platform.as_ref());

        let entries = match group.symlinks {
            None => continue,
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(ConfigError::SymlinksNotArray { platform }),
        };

        for entry in &entries {
            specs.push(spec_from_entry(entry, &platform)?);
        }
    }
    Ok(specs)
}

fn platform_label(value: Option<&Value>) -> String {
    let label = match value {
        None => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };
    if label.is_empty() {
        UNKNOWN_PLATFORM.to_string()
    } else {
        label
    }
}

fn spec_from_entry(entry: &Value, platform: &str) -> Result<LinkSpec, ConfigError> {
    if !entry.is_object() {
        return Err(ConfigError::EntryNotObject {
            platform: platform.to_string(),
        });
    }
    let entry = RawEntry::deserialize(entry).map_err(|e| ConfigError::InvalidEntry {
        platform: platform.to_string(),
        message: e.to_string(),
    })?;

    let link = entry.link.as_deref().map_or("", str::trim);
    let target = entry.target.as_deref().map_or("", str::trim);

    if entry.enabled == Some(false) {
        if link.is_empty() {
            return Err(ConfigError::DisabledMissingLink {
                platform: platform.to_string(),
            });
        }
        // Placeholder entries may omit the target; it is never dereferenced.
        let target = if target.is_empty() { "." } else { target };
        return Ok(LinkSpec {
            link: PathBuf::from(link),
            target: PathBuf::from(target),
            platform: platform.to_string(),
            enabled: false,
        });
    }

    if link.is_empty() || target.is_empty() {
        return Err(ConfigError::MissingLinkOrTarget {
            platform: platform.to_string(),
        });
    }
    Ok(LinkSpec {
        link: PathBuf::from(link),
        target: PathBuf::from(target),
        platform: platform.to_string(),
        enabled: true,
    })
}
