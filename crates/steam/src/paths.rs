use std::path::{Component, Path, PathBuf};

use crate::SteamError;

/// Segment marking a path that already points into a library's content tree.
pub const CONTENT_MARKER: &str = "SteamApps";

/// Subdirectory holding installed titles, below the content marker.
pub const COMMON_DIR: &str = "common";

/// Lexically normalizes a path: drops `.`, folds `..` into its parent and
/// rebuilds separators. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Converts `path` to an absolute, normalized path.
///
/// An empty path resolves to the current directory.
pub fn absolutize(path: impl AsRef<Path>) -> Result<PathBuf, SteamError> {
    let path = path.as_ref();
    let abs = if path.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(path)
    }
    .map_err(|e| SteamError::Io(format!("failed to resolve {}: {e}", path.display())))?;

    Ok(normalize_path(&abs))
}

/// Points a library root at its installed-titles directory.
///
/// Appends `SteamApps/common` unless the path already names the content
/// tree, so applying it twice changes nothing.
pub fn fix_game_path(root: &Path) -> Result<PathBuf, SteamError> {
    let text = root.to_string_lossy();
    let has_marker = text
        .to_ascii_lowercase()
        .contains(&CONTENT_MARKER.to_ascii_lowercase());

    let dir = if has_marker {
        root.to_path_buf()
    } else {
        root.join(content_dir_name()).join(COMMON_DIR)
    };
    absolutize(dir)
}

// Windows is case-insensitive; elsewhere Steam creates the lowercase form.
#[cfg(windows)]
fn content_dir_name() -> &'static str {
    CONTENT_MARKER
}

#[cfg(not(windows))]
fn content_dir_name() -> &'static str {
    "steamapps"
}
