//! cmbuild.toml configuration parsing
//!
//! The file is optional. Without it every setting takes its default, which
//! matches a project whose CMakeLists.txt sits one level above the build
//! directories.
//!
//! ```toml
//! [project]
//! source_dir = "../"
//! solution = "MyProject.sln"
//!
//! [build]
//! jobs = 8
//! toolchain = "vs2022Community"
//!
//! [cmake.definitions]
//! BUILD_TESTING = "OFF"
//!
//! [env]
//! CC = "clang"
//!
//! [toolchains.vs2022BuildTools]
//! product_name = "Visual Studio 2022 Build Tools"
//! version_number = "17.0"
//! cmake_generator_platform = "Visual Studio 17 2022"
//! env_script = 'D:\VS\BuildTools\Common7\Tools\VsDevCmd.bat'
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::build::toolchains::msvc::ToolchainDescriptor;
use crate::error::BuildError;

/// Default configuration file name, looked up in the invocation directory
pub const CONFIG_FILE_NAME: &str = "cmbuild.toml";

/// Alternate configuration file path
pub const ENV_CONFIG: &str = "CMBUILD_CONFIG";
/// Toolchain label override
pub const ENV_TOOLCHAIN: &str = "CMBUILD_TOOLCHAIN";
/// Parallel job count override
pub const ENV_JOBS: &str = "CMBUILD_JOBS";

/// Project source directory relative to a build directory
pub const DEFAULT_SOURCE_DIR: &str = "../";
/// Solution passed to msbuild by the Windows launcher
pub const DEFAULT_SOLUTION: &str = "BabylonCpp.sln";

/// Root configuration from cmbuild.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CmbuildConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub cmake: CMakeSettings,

    /// Environment overrides for cmake and the native build tool
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Extra or replacement toolchain descriptors, keyed by label
    #[serde(default)]
    pub toolchains: BTreeMap<String, ToolchainDescriptor>,
}

/// `[project]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// CMake source directory, relative to the build directory
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Solution file built by msbuild
    #[serde(default = "default_solution")]
    pub solution: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            solution: default_solution(),
        }
    }
}

fn default_source_dir() -> String {
    DEFAULT_SOURCE_DIR.to_string()
}

fn default_solution() -> String {
    DEFAULT_SOLUTION.to_string()
}

/// `[build]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    /// Parallel jobs for make; CPU count when unset
    pub jobs: Option<usize>,

    /// Toolchain label for the Windows provider
    pub toolchain: Option<String>,
}

/// `[cmake]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CMakeSettings {
    /// Extra `-D<NAME>=<value>` definitions for the configure step
    #[serde(default)]
    pub definitions: BTreeMap<String, String>,
}

impl CmbuildConfig {
    /// Load configuration for a project rooted at `root`, then apply environment overrides.
    ///
    /// `CMBUILD_CONFIG` must name an existing file; the default `cmbuild.toml`
    /// may be absent.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::load_from_path(PathBuf::from(path))?,
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    Self::load_from_path(path)?
                } else {
                    debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(lookup)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuildError::config_error_with_hint(
                format!("Failed to read {}: {}", path.display(), e),
                format!("Check the path or unset {}", ENV_CONFIG),
            )
        })?;

        debug!(path = %path.display(), "loaded configuration");
        Self::parse(&content).map_err(|e| match e {
            BuildError::Configuration { message, hint } => BuildError::Configuration {
                message: format!("{} ({})", message, path.display()),
                hint,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, BuildError> {
        let config: Self = toml::from_str(content).map_err(|e| {
            BuildError::config_error_with_hint(
                format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e.message()),
                "Check TOML syntax: quotes, brackets and section names",
            )
        })?;

        if config.build.jobs == Some(0) {
            return Err(BuildError::config_error("[build] jobs must be at least 1"));
        }

        Ok(config)
    }

    /// Apply `CMBUILD_TOOLCHAIN` and `CMBUILD_JOBS` from `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), BuildError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(label) = lookup(ENV_TOOLCHAIN).filter(|v| !v.is_empty()) {
            self.build.toolchain = Some(label);
        }

        if let Some(jobs) = lookup(ENV_JOBS).filter(|v| !v.is_empty()) {
            let jobs = jobs
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    BuildError::config_error(format!(
                        "{} must be a positive integer, got '{}'",
                        ENV_JOBS, jobs
                    ))
                })?;
            self.build.jobs = Some(jobs);
        }

        Ok(())
    }
}
