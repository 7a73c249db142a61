//! Per-title manifest scanning.
//!
//! Each installed title ships a `*.vdf` install script whose lines reference
//! files as `%INSTALLDIR%\path\file.ext`. Those references are resolved
//! against the title directory; existing files whose path names an installer
//! or redistributable become cleanup candidates.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::SteamError;
use crate::libraries::manifest_error;
use crate::paths::absolutize;

/// Resolved candidate path to its size in MiB.
pub type CandidateMap = BTreeMap<PathBuf, f64>;

/// Path substrings marking a file as safe to remove.
pub const DEFAULT_KEYWORDS: &[&str] = &["setup", "redist"];

/// Placeholder a manifest line must contain to be resolved.
pub const INSTALL_DIR_TOKEN: &str = "%INSTALLDIR%";

const INSTALL_DIR_NAME: &str = "INSTALLDIR";
const MANIFEST_MARKER: &str = ".vdf";

/// Characters kept after the extension dot. Longer extensions are cut.
const EXTENSION_LEN: usize = 3;

/// Scans title directories for removable installer files.
#[derive(Debug, Clone)]
pub struct Scanner {
    keywords: Vec<String>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl Scanner {
    /// Creates a scanner classifying by `keywords` (compared lower-cased).
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns the classification keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Scans every title directory and collects cleanup candidates.
    ///
    /// Titles without a manifest contribute nothing. A manifest that fails
    /// to decode or parse is abandoned at that line; the others still run.
    pub fn scan(&self, directories: &BTreeMap<String, PathBuf>) -> CandidateMap {
        let _span = tracing::info_span!("check_vdf").entered();

        let manifests: Vec<(&Path, PathBuf)> = directories
            .iter()
            .filter_map(|(title, dir)| {
                let manifest = find_manifest(dir);
                if manifest.is_none() {
                    tracing::debug!(title = %title, dir = %dir.display(), "no manifest found");
                }
                manifest.map(|m| (dir.as_path(), m))
            })
            .collect();

        let mut candidates = CandidateMap::new();
        for (dir, manifest) in manifests {
            if let Err(e) = self.scan_manifest(dir, &manifest, &mut candidates) {
                tracing::error!(kind = e.kind(), file = %manifest.display(), "{e}");
            }
        }
        candidates
    }

    /// Scans one manifest, adding candidates as it goes.
    fn scan_manifest(
        &self,
        content_dir: &Path,
        manifest: &Path,
        candidates: &mut CandidateMap,
    ) -> Result<(), SteamError> {
        let file = File::open(manifest).map_err(|e| manifest_error(manifest, e))?;

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| manifest_error(manifest, e))?;
            if !line.contains(INSTALL_DIR_TOKEN) {
                continue;
            }

            let Some(path) = resolve_install_dir(&line, content_dir, manifest)? else {
                continue;
            };

            let size = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => meta.len(),
                _ => {
                    tracing::debug!(path = %path.display(), "referenced file not present");
                    continue;
                }
            };

            if self.is_cleanable(&path) {
                let size_mb = size as f64 / 1024.0 / 1024.0;
                tracing::info!(path = %path.display(), size_mb, "cleanable file found");
                candidates.insert(path, size_mb);
            }
        }

        Ok(())
    }

    /// Returns true when the lower-cased path contains a keyword.
    pub fn is_cleanable(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Scans `directories` with the default keywords.
pub fn check_vdf(directories: &BTreeMap<String, PathBuf>) -> CandidateMap {
    Scanner::default().scan(directories)
}

/// Returns the immediate subdirectories of a content directory, keyed by
/// title directory name.
pub fn title_dirs(content_dir: &Path) -> Result<BTreeMap<String, PathBuf>, SteamError> {
    let entries = fs::read_dir(content_dir).map_err(|e| manifest_error(content_dir, e))?;

    let mut titles = BTreeMap::new();
    for entry in entries.flatten() {
        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        titles.insert(name, entry.path());
    }
    Ok(titles)
}

/// Returns the first regular file in `dir` whose name contains `.vdf`,
/// ordered by name, as an absolute path.
fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            let err = manifest_error(dir, e);
            tracing::warn!(kind = err.kind(), "unable to list title directory: {err}");
            return None;
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(MANIFEST_MARKER))
        .collect();
    names.sort();

    let first = names.into_iter().next()?;
    absolutize(dir.join(first)).ok()
}

/// Substitutes the title directory into a `%INSTALLDIR%` line.
///
/// The file name is cut three characters after its first dot. Returns
/// `Ok(None)` when the referenced name has no dot.
fn resolve_install_dir(
    line: &str,
    content_dir: &Path,
    manifest: &Path,
) -> Result<Option<PathBuf>, SteamError> {
    let mut segments = line.split('%').skip(1);
    let (Some(marker), Some(tail)) = (segments.next(), segments.next()) else {
        return Err(SteamError::ManifestFormat(manifest.display().to_string()));
    };

    let prefix = marker.replace(INSTALL_DIR_NAME, &content_dir.to_string_lossy());

    let Some(dot) = tail.find('.') else {
        tracing::debug!(line, "referenced file has no extension");
        return Ok(None);
    };
    let end = tail[dot..]
        .char_indices()
        .nth(EXTENSION_LEN + 1)
        .map_or(tail.len(), |(i, _)| dot + i);

    let relative = host_separators(&tail[..end]);
    let path = absolutize(format!("{prefix}{relative}"))?;
    Ok(Some(fold_case(path)))
}

#[cfg(windows)]
fn host_separators(path: &str) -> String {
    path.to_string()
}

#[cfg(not(windows))]
fn host_separators(path: &str) -> String {
    path.replace('\\', "/")
}

// Case-insensitive filesystem: the lower-cased path names the same file.
#[cfg(windows)]
fn fold_case(path: PathBuf) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

#[cfg(not(windows))]
fn fold_case(path: PathBuf) -> PathBuf {
    path
}
