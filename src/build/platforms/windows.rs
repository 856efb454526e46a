//! Windows provider: Visual Studio solutions built with `msbuild`
//!
//! `msbuild` only works inside a developer command prompt, so the build step
//! goes through a small batch launcher written into the build directory. The
//! launcher calls the toolchain's `VsDevCmd.bat` and then builds the solution.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{platform_key, PlatformProvider};
use crate::build::toolchains::{ToolchainDescriptor, ToolchainRegistry};
use crate::error::BuildError;
use crate::exec::subprocess::CommandLine;

/// Launcher file name inside the build directory
pub const LAUNCHER_NAME: &str = "runMSVCBuild.bat";

/// Windows host building with one selected Visual Studio toolchain
#[derive(Debug)]
pub struct WindowsProvider {
    label: String,
    toolchain: ToolchainDescriptor,
    solution: String,
}

impl WindowsProvider {
    /// Select toolchain `label` from `registry`; an unknown label is a configuration error
    pub fn new(label: &str, registry: &ToolchainRegistry, solution: &str) -> Result<Self, BuildError> {
        let toolchain = registry.get(label)?.clone();
        Ok(Self {
            label: label.to_string(),
            toolchain,
            solution: solution.to_string(),
        })
    }

    /// Batch script body: load the developer environment, then build
    pub fn launcher_script(&self) -> String {
        format!(
            "call \"{}\"\r\nmsbuild \"{}\"\r\n",
            self.toolchain.env_script.display(),
            self.solution
        )
    }

    /// Where the launcher is written for `build_dir`
    pub fn launcher_path(build_dir: &Path) -> PathBuf {
        build_dir.join(LAUNCHER_NAME)
    }
}

impl PlatformProvider for WindowsProvider {
    fn generator_name(&self) -> String {
        self.toolchain.cmake_generator_platform.clone()
    }

    fn platform_key(&self) -> String {
        platform_key("windows", std::env::consts::ARCH, usize::BITS)
    }

    /// Writes the launcher (replacing any earlier one) and returns its path as the command.
    ///
    /// The path is passed as a single argument rather than a shell line, so
    /// `(`, `)` and `&` in the project path need no quoting.
    fn build_command(&self, build_dir: &Path, _verbose: bool) -> Result<CommandLine, BuildError> {
        let launcher = Self::launcher_path(build_dir);
        std::fs::write(&launcher, self.launcher_script())
            .map_err(|e| BuildError::filesystem("write launcher", &launcher, e))?;

        debug!(
            launcher = %launcher.display(),
            label = %self.label,
            toolchain = %self.toolchain.product_name,
            "wrote msbuild launcher"
        );
        Ok(CommandLine::args([launcher.to_string_lossy().into_owned()]))
    }
}
