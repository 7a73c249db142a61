//! Safe candidate deletion.

use std::path::{Path, PathBuf};

use steamclean_steam::CandidateMap;

use crate::FileOpsError;

/// Outcome of a deletion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteSummary {
    pub deleted: u32,
    pub freed_mb: f64,
    pub failed: Vec<(PathBuf, String)>,
}

/// Deletes every candidate that passes [`delete_candidate`]'s checks.
///
/// Failures are collected, never fatal.
pub fn delete_candidates(candidates: &CandidateMap, roots: &[PathBuf]) -> DeleteSummary {
    let mut summary = DeleteSummary::default();

    for (path, size_mb) in candidates {
        match delete_candidate(path, roots) {
            Ok(()) => {
                summary.deleted += 1;
                summary.freed_mb += size_mb;
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to delete candidate");
                summary.failed.push((path.clone(), e.to_string()));
            }
        }
    }

    if summary.deleted > 0 {
        tracing::info!(
            deleted = summary.deleted,
            freed_mb = summary.freed_mb,
            "cleaned up redistributable files"
        );
    }
    summary
}

/// Deletes one candidate file.
///
/// Safety checks:
/// 1. Path must resolve to an existing regular file.
/// 2. Path must lie under one of `roots` (the scanned content directories).
pub fn delete_candidate(path: &Path, roots: &[PathBuf]) -> Result<(), FileOpsError> {
    let abs = std::fs::canonicalize(path).map_err(|source| FileOpsError::Resolve {
        path: path.display().to_string(),
        source,
    })?;

    if !abs.is_file() {
        return Err(FileOpsError::NotAFile(abs.display().to_string()));
    }

    let inside = roots.iter().any(|root| {
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.clone());
        abs.starts_with(&root) && abs != root
    });
    if !inside {
        return Err(FileOpsError::OutsideRoots(abs.display().to_string()));
    }

    std::fs::remove_file(&abs).map_err(|source| FileOpsError::Delete {
        path: abs.display().to_string(),
        source,
    })?;

    tracing::info!(path = %abs.display(), "deleted file");
    Ok(())
}
