//! Review and removal of cleanup candidates.
//!
//! Candidates come from `steamclean_steam::check_vdf`. Nothing here decides
//! what is cleanable; it only summarises and deletes what it is given, after
//! re-checking each path.

mod delete;
mod review;

pub use delete::{DeleteSummary, delete_candidate, delete_candidates};
pub use review::{Candidate, Report};

/// Errors produced while removing a candidate.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("failed to resolve path {path}: {source}")]
    Resolve {
        path: String,
        source: std::io::Error,
    },

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("refusing to delete path outside scanned directories: {0}")]
    OutsideRoots(String),

    #[error("failed to delete {path}: {source}")]
    Delete {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
