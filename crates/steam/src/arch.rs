use std::fmt;

use crate::SteamError;

/// Host processor word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit host; Steam registers under the WOW64 compatibility node.
    X64,
    /// 32-bit host; Steam registers under the direct key.
    X86,
}

impl Architecture {
    /// Parses a word-size or processor identifier.
    ///
    /// Accepts `64bit`/`32bit` as well as the identifiers reported by
    /// `PROCESSOR_ARCHITECTURE` and Rust target arches.
    pub fn parse(value: &str) -> Result<Self, SteamError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "64bit" | "amd64" | "x86_64" | "arm64" | "aarch64" | "ia64" => Ok(Architecture::X64),
            "32bit" | "x86" | "i386" | "i586" | "i686" | "arm" => Ok(Architecture::X86),
            _ => Err(SteamError::PlatformDetection(value.to_string())),
        }
    }

    /// Detects the host architecture.
    pub fn detect() -> Result<Self, SteamError> {
        Self::parse(&host_identifier())
    }

    /// Returns the word-size label for this architecture.
    pub fn word_size(&self) -> &'static str {
        match self {
            Architecture::X64 => "64bit",
            Architecture::X86 => "32bit",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word_size())
    }
}

// A 32-bit process on a 64-bit Windows host sees the real processor in
// PROCESSOR_ARCHITEW6432.
#[cfg(windows)]
pub(crate) fn host_identifier() -> String {
    std::env::var("PROCESSOR_ARCHITEW6432")
        .or_else(|_| std::env::var("PROCESSOR_ARCHITECTURE"))
        .unwrap_or_default()
}

#[cfg(not(windows))]
pub(crate) fn host_identifier() -> String {
    std::env::consts::ARCH.to_string()
}
