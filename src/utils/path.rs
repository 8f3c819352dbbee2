//! Path helpers for project-relative paths.
//!
//! Keil project files store every file and include path relative to the
//! directory that contains the project document. These helpers compute those
//! relative paths lexically (no symlink resolution) and compare stored entries
//! the way µVision does: case-insensitively, with `\` and `/` treated as the
//! same separator.

use std::{
    env,
    path::{Component, MAIN_SEPARATOR, Path, PathBuf},
};

use tracing::warn;

/// Make `path` absolute against the current working directory and resolve
/// `.` and `..` components lexically.
///
/// If the current directory cannot be determined, relative paths are only
/// normalized, not made absolute.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    normalize_lexically(&joined)
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// A `..` directly below the root stays at the root, matching how operating
/// systems resolve `/..`.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Compute `path` relative to `base`.
///
/// Both paths are made absolute first. Returns `None` when the two paths do
/// not share a root (for example two different Windows drives).
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = absolutize(path);
    let base = absolutize(base);

    let mut path_components = path.components().peekable();
    let mut base_components = base.components().peekable();

    // Prefix and root must match exactly, otherwise there is no relative path.
    loop {
        match (path_components.peek(), base_components.peek()) {
            (Some(Component::Prefix(a)), Some(Component::Prefix(b))) => {
                if !a.as_os_str().eq_ignore_ascii_case(b.as_os_str()) {
                    return None;
                }
            }
            (Some(Component::Prefix(_)), _) | (_, Some(Component::Prefix(_))) => return None,
            (Some(Component::RootDir), Some(Component::RootDir)) => {}
            (Some(Component::RootDir), _) | (_, Some(Component::RootDir)) => return None,
            _ => break,
        }
        path_components.next();
        base_components.next();
    }

    while let (Some(a), Some(b)) = (path_components.peek(), base_components.peek()) {
        if a != b {
            break;
        }
        path_components.next();
        base_components.next();
    }

    let mut relative = PathBuf::new();
    for _ in base_components {
        relative.push("..");
    }
    for component in path_components {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }

    Some(relative)
}

/// Compute the path stored in the project file for `path`.
///
/// The result is relative to `project_dir` and always starts with `..` or
/// `./`. When no relative path exists the original path is returned unchanged
/// and a warning is logged.
#[must_use]
pub fn project_relative(path: &Path, project_dir: &Path) -> String {
    let Some(relative) = relative_to(path, project_dir) else {
        warn!(
            "Cannot express {} relative to {}, storing it as given",
            path.display(),
            project_dir.display()
        );
        return path.display().to_string();
    };

    let starts_with_marker = matches!(
        relative.components().next(),
        Some(Component::ParentDir | Component::CurDir)
    );

    if starts_with_marker {
        relative.display().to_string()
    } else {
        format!(".{MAIN_SEPARATOR}{}", relative.display())
    }
}

/// Comparison key for a stored path.
///
/// Lower-cased, `\` replaced with `/`, trailing separators and leading `./`
/// markers removed.
#[must_use]
pub fn comparison_key(path: &str) -> String {
    let mut key = path.trim().replace('\\', "/").to_lowercase();

    while key.len() > 1 && key.ends_with('/') {
        key.pop();
    }

    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }

    key
}

/// Whether two stored paths refer to the same location.
#[must_use]
pub fn paths_equal(a: &str, b: &str) -> bool {
    comparison_key(a) == comparison_key(b)
}

/// Whether `entry` is `dir` itself or lies somewhere below it.
#[must_use]
pub fn is_same_or_within(entry: &str, dir: &str) -> bool {
    let entry = comparison_key(entry);
    let dir = comparison_key(dir);

    if entry == dir {
        return true;
    }

    // The project directory itself holds every entry that stays below it
    if dir == "." {
        return !is_outside_project(&entry);
    }

    entry.starts_with(&format!("{dir}/"))
}

/// Whether a comparison key climbs out of the project directory or is
/// absolute.
fn is_outside_project(key: &str) -> bool {
    key == ".." || key.starts_with("../") || key.starts_with('/') || key.contains(':')
}

/// The last component of a folder path, used for default group names.
///
/// `.` and other relative spellings are resolved against the current
/// directory first so that `.` yields the real folder name.
#[must_use]
pub fn folder_name(folder: &Path) -> String {
    absolutize(folder).file_name().map_or_else(
        || folder.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
