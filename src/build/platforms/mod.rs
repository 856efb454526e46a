//! Platform providers
//!
//! A provider answers three questions for the host: which CMake generator to
//! configure with, how to tag the platform in logs, and which command builds
//! a configured tree. Exactly one provider is selected per run, from the host
//! operating system, by [`select_provider`].
//!
//! - **Unix-like** (Linux, macOS, BSDs): `Unix Makefiles`, built with `make --jobs=N`
//! - **Windows-like**: a Visual Studio generator, built through a generated
//!   launcher script that loads the developer environment and runs `msbuild`

pub mod unix;
pub mod windows;

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::build::toolchains::{ToolchainRegistry, DEFAULT_TOOLCHAIN};
use crate::config::CmbuildConfig;
use crate::error::BuildError;
use crate::exec::subprocess::CommandLine;

pub use unix::UnixProvider;
pub use windows::WindowsProvider;

/// Host-specific generator and build command
pub trait PlatformProvider {
    /// Value for `cmake -G`
    fn generator_name(&self) -> String;

    /// Short OS/architecture tag, informational only
    fn platform_key(&self) -> String;

    /// Command that builds the tree in `build_dir`
    ///
    /// May have side effects inside `build_dir` (the Windows launcher script).
    fn build_command(&self, build_dir: &Path, verbose: bool) -> Result<CommandLine, BuildError>;
}

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    UnixLike,
    WindowsLike,
}

impl HostPlatform {
    /// Detect the platform this binary runs on
    pub fn detect() -> Result<Self, BuildError> {
        Self::from_os(std::env::consts::OS, std::env::consts::FAMILY)
    }

    /// Classify an OS name and family as reported by `std::env::consts`
    pub fn from_os(os: &str, family: &str) -> Result<Self, BuildError> {
        match (os, family) {
            ("windows", _) => Ok(HostPlatform::WindowsLike),
            (_, "unix") => Ok(HostPlatform::UnixLike),
            _ => Err(BuildError::config_error(format!(
                "Unsupported host platform '{}' ({})",
                os, family
            ))),
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::UnixLike => write!(f, "unix"),
            HostPlatform::WindowsLike => write!(f, "windows"),
        }
    }
}

/// Build the platform tag from an OS name, architecture and pointer width.
///
/// Linux on x86 gives `linux_x86_64` / `linux_x86_32`, Windows gives
/// `win32_64` / `win32_32`, any other host gives `<os>_<arch>`.
pub fn platform_key(os: &str, arch: &str, pointer_width: u32) -> String {
    let bits = if pointer_width == 64 { "64" } else { "32" };
    match os {
        "linux" if arch == "x86_64" || arch == "x86" => format!("linux_x86_{}", bits),
        "windows" => format!("win32_{}", bits),
        _ => format!("{}_{}", os, arch),
    }
}

/// Toolchain label in precedence order: command line, then config (which
/// already carries `CMBUILD_TOOLCHAIN`), then the built-in default
pub fn resolve_toolchain_label(cli: Option<&str>, config: &CmbuildConfig) -> String {
    cli.map(str::to_string)
        .or_else(|| config.build.toolchain.clone())
        .unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_string())
}

/// Instantiate the provider for `host`
pub fn select_provider(
    host: HostPlatform,
    config: &CmbuildConfig,
    toolchain: Option<&str>,
) -> Result<Box<dyn PlatformProvider>, BuildError> {
    let provider: Box<dyn PlatformProvider> = match host {
        HostPlatform::UnixLike => Box::new(UnixProvider::new(config.build.jobs)),
        HostPlatform::WindowsLike => {
            let label = resolve_toolchain_label(toolchain, config);
            let registry = ToolchainRegistry::with_overrides(&config.toolchains);
            Box::new(WindowsProvider::new(
                &label,
                &registry,
                &config.project.solution,
            )?)
        }
    };

    debug!(
        host = %host,
        platform_key = %provider.platform_key(),
        generator = %provider.generator_name(),
        "selected platform provider"
    );
    Ok(provider)
}
