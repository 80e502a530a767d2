//! Path normalization, relative retargeting, and location equality.
//!
//! Link targets frequently do not exist yet when they are compared, so
//! equality is two-tiered: canonical resolution when both sides exist,
//! lexical normalization otherwise.
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path` without consulting the filesystem.
///
/// Redundant separators and `.` segments are dropped and `..` collapses the
/// preceding normal segment. A `..` that would climb above the root of an
/// absolute path is discarded; leading `..` segments of a relative path are
/// kept. An empty result is returned as `.`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use symlinks_cli::paths::normalize;
///
/// assert_eq!(normalize(Path::new("/repo/./a//b/../c")), PathBuf::from("/repo/a/c"));
/// assert_eq!(normalize(Path::new("../x/./y")), PathBuf::from("../x/y"));
/// assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => pop_parent(&mut out),
            Component::Normal(name) => out.push(name),
        }
    }
    or_current_dir(out)
}

/// Apply one `..` segment to a normalized path.
fn pop_parent(out: &mut PathBuf) {
    match out.components().next_back() {
        Some(Component::Normal(_)) => {
            out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        Some(Component::ParentDir | Component::CurDir) | None => out.push(".."),
    }
}

fn or_current_dir(path: PathBuf) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}

/// Join `relative` under `root` and normalize the result.
///
/// An absolute `relative` replaces `root` entirely, matching [`Path::join`].
#[must_use]
pub fn resolve_under(root: &Path, relative: &Path) -> PathBuf {
    normalize(&root.join(relative))
}

/// Resolve `path` physically as far as it exists, using `canonicalize` to
/// consult the filesystem.
///
/// Components are applied left to right and the prefix is canonicalized
/// after each normal segment, so symlinked directories (and `..` segments
/// that climb out of them) are followed the way the kernel would follow
/// them. Segments below a missing directory are kept lexically.
#[must_use]
pub fn resolve_existing_with<F>(path: &Path, canonicalize: F) -> PathBuf
where
    F: Fn(&Path) -> io::Result<PathBuf>,
{
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => pop_parent(&mut resolved),
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(canonical) = canonicalize(&resolved) {
                    resolved = canonical;
                }
            }
        }
    }
    or_current_dir(resolved)
}

/// Whether `a` and `b` denote the same location, using `canonicalize` to
/// consult the filesystem.
///
/// Both sides are canonicalized first. If canonicalization fails for either
/// side (usually because it does not exist) the lexically normalized forms
/// are compared instead.
pub fn same_location_with<F>(a: &Path, b: &Path, canonicalize: F) -> bool
where
    F: Fn(&Path) -> io::Result<PathBuf>,
{
    match (canonicalize(a), canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => normalize(a) == normalize(b),
    }
}

/// Express `target` relative to the directory `base`.
///
/// Both paths are expected to be absolute. The result is what a link created
/// inside `base` should store so that it resolves to `target`. Identical
/// paths yield `.`. When the paths have different roots (for example
/// different drive prefixes on Windows) no relative form exists and the
/// normalized `target` is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use symlinks_cli::paths::relative_to;
///
/// assert_eq!(
///     relative_to(Path::new("/repo/a"), Path::new("/repo/c/d")),
///     PathBuf::from("../c/d")
/// );
/// ```
#[must_use]
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base = normalize(base);
    let target = normalize(target);

    if leading_root(&base) != leading_root(&target) {
        return target;
    }

    let mut base_rest = base.components().peekable();
    let mut target_rest = target.components().peekable();
    while let (Some(b), Some(t)) = (base_rest.peek(), target_rest.peek()) {
        if b != t {
            break;
        }
        base_rest.next();
        target_rest.next();
    }

    let mut relative = PathBuf::new();
    for _ in base_rest {
        relative.push("..");
    }
    for component in target_rest {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// The prefix and root components of `path`, used to decide whether two
/// paths can be related at all.
fn leading_root(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}
