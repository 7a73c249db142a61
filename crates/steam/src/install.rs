//! Steam installation root discovery.
//!
//! The root comes from the registry on Windows and from well-known home
//! directory locations elsewhere. When the store denies access the user is
//! asked for the path instead.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::SteamError;
use crate::arch::{self, Architecture};
use crate::paths::absolutize;

/// Registry value holding the Steam installation directory.
pub const INSTALL_PATH_VALUE: &str = "InstallPath";

const REGISTRY_BASE: &str = "HKEY_LOCAL_MACHINE";

/// Question asked when the installation path cannot be read.
const PROMPT_QUESTION: &str = "Please enter the Steam installation directory: ";

/// Location of the Steam key under `HKEY_LOCAL_MACHINE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryLocation {
    pub subkey: &'static str,
    /// Open through the 64-bit registry view.
    pub wow64: bool,
}

impl RegistryLocation {
    /// Returns the key variant Steam registers under for `arch`.
    pub fn for_arch(arch: Architecture) -> Self {
        match arch {
            Architecture::X64 => Self {
                subkey: r"SOFTWARE\Wow6432Node\Valve\Steam",
                wow64: true,
            },
            Architecture::X86 => Self {
                subkey: r"SOFTWARE\Valve\Steam",
                wow64: false,
            },
        }
    }

    /// Full key path including the hive, for diagnostics.
    pub fn full_path(&self) -> String {
        format!("{REGISTRY_BASE}\\{}", self.subkey)
    }
}

/// Platform configuration storage holding the installation path.
pub trait ConfigStore {
    /// Reads the `InstallPath` value at `location`.
    ///
    /// Implementations must release any handle they open before returning.
    fn read_install_path(&self, location: &RegistryLocation) -> Result<String, SteamError>;
}

/// Interactive fallback used when the store cannot be read.
pub trait Prompt {
    /// Shows `notice` and `question`, then blocks until an answer is given.
    fn ask(&mut self, notice: &str, question: &str) -> Result<String, SteamError>;
}

/// Line-based prompt over a reader/writer pair.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt bound to the process console.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn ask(&mut self, notice: &str, question: &str) -> Result<String, SteamError> {
        let io_err = |e: io::Error| SteamError::Io(format!("console prompt failed: {e}"));

        writeln!(self.output, "{notice}").map_err(io_err)?;
        write!(self.output, "{question}").map_err(io_err)?;
        self.output.flush().map_err(io_err)?;

        let mut answer = String::new();
        self.input.read_line(&mut answer).map_err(io_err)?;
        Ok(answer)
    }
}

/// Resolves the Steam installation root for the detected host architecture.
pub fn resolve_install_path(
    store: &dyn ConfigStore,
    prompt: &mut dyn Prompt,
) -> Result<PathBuf, SteamError> {
    resolve_install_path_for(&arch::host_identifier(), store, prompt)
}

/// Resolves the Steam installation root for an explicit architecture identifier.
///
/// An unknown identifier fails with [`SteamError::PlatformDetection`] before
/// the store is touched.
pub fn resolve_install_path_for(
    arch_id: &str,
    store: &dyn ConfigStore,
    prompt: &mut dyn Prompt,
) -> Result<PathBuf, SteamError> {
    let _span = tracing::info_span!("resolve_install_path").entered();

    let arch = Architecture::parse(arch_id).inspect_err(|e| {
        tracing::error!(kind = e.kind(), arch = arch_id, "unable to determine system architecture");
    })?;
    if arch == Architecture::X86 {
        tracing::info!("32 bit operating system detected");
    }

    let location = RegistryLocation::for_arch(arch);
    let raw = match store.read_install_path(&location) {
        Ok(path) => {
            tracing::info!(key = %location.full_path(), "registry data used to determine installation path");
            path
        }
        Err(e @ SteamError::ConfigAccessDenied(_)) => {
            tracing::error!(kind = e.kind(), key = %location.full_path(), "permission denied to read registry key");
            tracing::error!("run this tool as administrator to resolve");
            let notice = format!(
                "Permission denied to read registry data at {}.",
                location.full_path()
            );
            prompt.ask(&notice, PROMPT_QUESTION)?
        }
        Err(e @ SteamError::ConfigNotFound(_)) => {
            tracing::warn!(kind = e.kind(), key = %location.full_path(), "steam installation not registered");
            let notice = format!("No Steam installation found at {}.", location.full_path());
            prompt.ask(&notice, PROMPT_QUESTION)?
        }
        Err(e) => return Err(e),
    };

    let install_path = absolutize(raw.trim())?;
    tracing::info!(path = %install_path.display(), "steam installation path found");
    Ok(install_path)
}

/// Maps an I/O error from the store into the taxonomy.
#[cfg_attr(not(windows), allow(dead_code))]
fn store_error(location: &RegistryLocation, e: io::Error) -> SteamError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => SteamError::ConfigAccessDenied(location.full_path()),
        io::ErrorKind::NotFound => SteamError::ConfigNotFound(location.full_path()),
        _ => SteamError::Io(format!("failed to read {}: {e}", location.full_path())),
    }
}

/// Registry-backed store.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl ConfigStore for WindowsRegistry {
    fn read_install_path(&self, location: &RegistryLocation) -> Result<String, SteamError> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY};

        let flags = if location.wow64 {
            KEY_READ | KEY_WOW64_64KEY
        } else {
            KEY_READ
        };

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        // The key handle is closed when `key` drops, on every return path.
        let key = hklm
            .open_subkey_with_flags(location.subkey, flags)
            .map_err(|e| store_error(location, e))?;
        key.get_value(INSTALL_PATH_VALUE)
            .map_err(|e| store_error(location, e))
    }
}

/// Store for hosts without a registry: probes the usual Steam locations
/// under `$HOME`.
#[cfg(not(windows))]
#[derive(Debug, Default, Clone, Copy)]
pub struct HomeDirStore;

#[cfg(not(windows))]
impl ConfigStore for HomeDirStore {
    fn read_install_path(&self, location: &RegistryLocation) -> Result<String, SteamError> {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| SteamError::ConfigNotFound(location.full_path()))?;

        let candidates = [
            home.join(".steam").join("steam"),
            home.join(".local").join("share").join("Steam"),
            home.join(".var")
                .join("app")
                .join("com.valvesoftware.Steam")
                .join(".steam")
                .join("steam"),
        ];

        candidates
            .iter()
            .find(|dir| dir.exists())
            .map(|dir| dir.to_string_lossy().into_owned())
            .ok_or_else(|| SteamError::ConfigNotFound(location.full_path()))
    }
}

/// Returns the configuration store for the current platform.
pub fn platform_store() -> Box<dyn ConfigStore> {
    #[cfg(windows)]
    {
        Box::new(WindowsRegistry)
    }

    #[cfg(not(windows))]
    {
        Box::new(HomeDirStore)
    }
}
