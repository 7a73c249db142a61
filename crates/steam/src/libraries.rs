//! Additional library discovery from `steamapps/libraryfolders.vdf`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::SteamError;
use crate::paths::normalize_path;

/// Library manifest location relative to the installation root.
pub const LIBRARY_FOLDERS_DIR: &str = "steamapps";
pub const LIBRARY_FOLDERS_FILE: &str = "libraryfolders.vdf";

/// Indexed library line: a tab, a quoted index 1-8, then a quoted path.
static LIBRARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\t"[1-8]".*(".*")"#).expect("library line pattern is valid")
});

/// Returns the configured library roots, in file order.
///
/// A missing or unreadable manifest is logged and yields an empty list.
/// Returned paths are not checked for existence.
pub fn get_libraries(install_path: &Path) -> Vec<PathBuf> {
    match read_libraries(install_path) {
        Ok(libraries) => libraries,
        Err(e @ (SteamError::ManifestNotFound(_) | SteamError::ManifestAccessDenied(_))) => {
            tracing::error!(kind = e.kind(), "{e}");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), "failed to read libraries: {e}");
            Vec::new()
        }
    }
}

/// Reads the library manifest under `install_path`, reporting why it failed.
///
/// A line that fails to decode ends the read; entries before it are kept.
pub fn read_libraries(install_path: &Path) -> Result<Vec<PathBuf>, SteamError> {
    let _span = tracing::info_span!("get_libraries").entered();

    let lib_file = normalize_path(
        &install_path
            .join(LIBRARY_FOLDERS_DIR)
            .join(LIBRARY_FOLDERS_FILE),
    );
    tracing::info!(file = %lib_file.display(), "attempting to read libraries");
    let file = File::open(&lib_file).map_err(|e| manifest_error(&lib_file, e))?;

    let mut libraries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                let err = manifest_error(&lib_file, e);
                tracing::error!(kind = err.kind(), kept = libraries.len(), "{err}");
                break;
            }
            Err(e) => return Err(manifest_error(&lib_file, e)),
        };
        if let Some(dir) = parse_library_line(&line) {
            tracing::info!(path = %dir.display(), "library found");
            libraries.push(dir);
        }
    }

    Ok(libraries)
}

/// Extracts the library path from one manifest line, if it is an indexed entry.
fn parse_library_line(line: &str) -> Option<PathBuf> {
    let caps = LIBRARY_LINE.captures(line)?;
    let raw = caps.get(1)?.as_str().trim_matches('"');
    // VDF escapes backslashes.
    let unescaped = raw.replace(r"\\", r"\");
    Some(normalize_path(Path::new(&unescaped)))
}

/// Maps an I/O error on a manifest file into the taxonomy.
pub(crate) fn manifest_error(path: &Path, e: io::Error) -> SteamError {
    let shown = path.display().to_string();
    match e.kind() {
        io::ErrorKind::NotFound => SteamError::ManifestNotFound(shown),
        io::ErrorKind::PermissionDenied => SteamError::ManifestAccessDenied(shown),
        io::ErrorKind::InvalidData => SteamError::ManifestDecode(shown),
        _ => SteamError::Io(format!("{shown}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_manifest(root: &Path, body: &str) {
        let dir = root.join(LIBRARY_FOLDERS_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LIBRARY_FOLDERS_FILE), body).unwrap();
    }

    #[test]
    fn reads_indexed_entries_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(
            tmp.path(),
            "\"LibraryFolders\"\n{\n\t\"TimeNextStatsReport\"\t\t\"1425495426\"\n\
             \t\"ContentStatsID\"\t\t\"-2633523129022418718\"\n\
             \t\"1\"\t\t\"/mnt/games\"\n\
             \t\"2\"\t\t\"/mnt/more/./games\"\n}\n",
        );

        let libs = get_libraries(tmp.path());
        assert_eq!(
            libs,
            vec![PathBuf::from("/mnt/games"), PathBuf::from("/mnt/more/games")]
        );
    }

    #[test]
    fn ignores_non_matching_lines() {
        // Index outside 1-8.
        assert!(parse_library_line("\t\"9\"\t\t\"/x\"").is_none());
        assert!(parse_library_line("\t\"0\"\t\t\"/x\"").is_none());
        // Not tab-indented at line start.
        assert!(parse_library_line("  \"1\"\t\t\"/x\"").is_none());
        // Nested deeper than one tab.
        assert!(parse_library_line("\t\t\"1\"\t\t\"/x\"").is_none());
        // Index with no path token.
        assert!(parse_library_line("\t\"1\"").is_none());
    }

    #[test]
    fn unescapes_vdf_backslashes() {
        let dir = parse_library_line("\t\"1\"\t\t\"C:\\\\Games\"").unwrap();
        assert!(!dir.to_string_lossy().contains("\\\\"));
        assert!(!dir.to_string_lossy().contains('"'));
    }

    #[test]
    fn drive_letter_library_paths() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(
            tmp.path(),
            "\t\"1\"    \"C:\\\\Games\"\n\t\"2\"    \"D:\\\\Games\"\n",
        );
        assert_eq!(
            get_libraries(tmp.path()),
            vec![PathBuf::from(r"C:\Games"), PathBuf::from(r"D:\Games")]
        );
    }

    #[test]
    fn missing_manifest_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(get_libraries(tmp.path()).is_empty());

        let err = read_libraries(tmp.path()).unwrap_err();
        assert!(matches!(err, SteamError::ManifestNotFound(_)));
    }

    #[test]
    fn invalid_utf8_keeps_earlier_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(LIBRARY_FOLDERS_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(LIBRARY_FOLDERS_FILE),
            b"\t\"1\"\t\"/a\"\n\xff\xfe\n\t\"2\"\t\"/b\"\n",
        )
        .unwrap();

        assert_eq!(read_libraries(tmp.path()).unwrap(), vec![PathBuf::from("/a")]);
        assert_eq!(get_libraries(tmp.path()), vec![PathBuf::from("/a")]);
    }

    #[test]
    fn unreadable_manifest_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory in place of the file fails on read on every host and user.
        fs::create_dir_all(tmp.path().join(LIBRARY_FOLDERS_DIR).join(LIBRARY_FOLDERS_FILE))
            .unwrap();

        assert!(read_libraries(tmp.path()).is_err());
        assert!(get_libraries(tmp.path()).is_empty());
    }

    #[test]
    fn error_mapping() {
        let p = Path::new("x.vdf");
        assert!(matches!(
            manifest_error(p, io::Error::from(io::ErrorKind::NotFound)),
            SteamError::ManifestNotFound(_)
        ));
        assert!(matches!(
            manifest_error(p, io::Error::from(io::ErrorKind::PermissionDenied)),
            SteamError::ManifestAccessDenied(_)
        ));
        assert!(matches!(
            manifest_error(p, io::Error::from(io::ErrorKind::InvalidData)),
            SteamError::ManifestDecode(_)
        ));
    }
}
