//! Steam installation discovery and cleanable-file detection.
//!
//! The pipeline runs leaf-first:
//! [`resolve_install_path`] → [`get_libraries`] → [`fix_game_path`] →
//! [`check_vdf`]. Only [`SteamError::PlatformDetection`] is fatal; every other
//! failure degrades to an empty or partial result plus a diagnostic.

pub mod arch;
pub mod install;
pub mod libraries;
pub mod manifest;
pub mod paths;

// Re-export primary types.
pub use arch::Architecture;
pub use install::{
    ConfigStore, ConsolePrompt, Prompt, RegistryLocation, resolve_install_path,
    resolve_install_path_for,
};
pub use libraries::{get_libraries, read_libraries};
pub use manifest::{CandidateMap, DEFAULT_KEYWORDS, Scanner, check_vdf};
pub use paths::{fix_game_path, normalize_path};

#[cfg(windows)]
pub use install::WindowsRegistry;

/// Errors for Steam discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("unable to determine system architecture: {0}")]
    PlatformDetection(String),

    #[error("permission denied reading registry key {0}")]
    ConfigAccessDenied(String),

    #[error("registry value not found at {0}")]
    ConfigNotFound(String),

    #[error("unable to find file {0}")]
    ManifestNotFound(String),

    #[error("permission denied to {0}")]
    ManifestAccessDenied(String),

    #[error("invalid characters found in file {0}")]
    ManifestDecode(String),

    #[error("invalid data in file {0}")]
    ManifestFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SteamError {
    /// Short stable tag used as the `kind` field of log records.
    pub fn kind(&self) -> &'static str {
        match self {
            SteamError::PlatformDetection(_) => "platform_detection",
            SteamError::ConfigAccessDenied(_) => "config_access_denied",
            SteamError::ConfigNotFound(_) => "config_not_found",
            SteamError::ManifestNotFound(_) => "manifest_not_found",
            SteamError::ManifestAccessDenied(_) => "manifest_access_denied",
            SteamError::ManifestDecode(_) => "manifest_decode",
            SteamError::ManifestFormat(_) => "manifest_format",
            SteamError::Io(_) => "io",
        }
    }

    /// Returns true for the only kind that must terminate a run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SteamError::PlatformDetection(_))
    }
}
