//! Visual Studio toolchain descriptors
//!
//! A descriptor carries what the Windows provider needs to drive a specific
//! Visual Studio install: the CMake generator string and the developer
//! command prompt script that sets up `msbuild` and the compilers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{hints, BuildError};

/// Label used when neither the command line, environment nor config picks one
pub const DEFAULT_TOOLCHAIN: &str = "vs2017Community";

/// One Visual Studio installation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolchainDescriptor {
    /// Human readable product name, e.g. "Visual Studio 2017"
    pub product_name: String,
    /// Visual Studio version, e.g. "15.0"
    pub version_number: String,
    /// Value passed to `cmake -G`
    pub cmake_generator_platform: String,
    /// Absolute path to the environment initialization script (VsDevCmd.bat)
    pub env_script: PathBuf,
}

impl ToolchainDescriptor {
    fn new(product_name: &str, version_number: &str, generator: &str, env_script: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            version_number: version_number.to_string(),
            cmake_generator_platform: generator.to_string(),
            env_script: PathBuf::from(env_script),
        }
    }

    /// Whether the environment script exists on this host
    pub fn is_available(&self) -> bool {
        self.env_script.is_file()
    }
}

/// Read-only table of known toolchains keyed by label
#[derive(Debug, Clone)]
pub struct ToolchainRegistry {
    entries: BTreeMap<String, ToolchainDescriptor>,
}

impl ToolchainRegistry {
    /// Descriptors for the stock Community editions in their default install locations
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "vs2017Community".to_string(),
            ToolchainDescriptor::new(
                "Visual Studio 2017",
                "15.0",
                "Visual Studio 15 2017 Win64",
                r"C:\Program Files (x86)\Microsoft Visual Studio\2017\Community\Common7\Tools\VsDevCmd.bat",
            ),
        );
        entries.insert(
            "vs2019Community".to_string(),
            ToolchainDescriptor::new(
                "Visual Studio 2019",
                "16.0",
                "Visual Studio 16 2019",
                r"C:\Program Files (x86)\Microsoft Visual Studio\2019\Community\Common7\Tools\VsDevCmd.bat",
            ),
        );
        entries.insert(
            "vs2022Community".to_string(),
            ToolchainDescriptor::new(
                "Visual Studio 2022",
                "17.0",
                "Visual Studio 17 2022",
                r"C:\Program Files\Microsoft Visual Studio\2022\Community\Common7\Tools\VsDevCmd.bat",
            ),
        );
        Self { entries }
    }

    /// Built-in table with `overrides` added; an override replaces a built-in of the same label
    pub fn with_overrides(overrides: &BTreeMap<String, ToolchainDescriptor>) -> Self {
        let mut registry = Self::builtin();
        for (label, descriptor) in overrides {
            registry.entries.insert(label.clone(), descriptor.clone());
        }
        registry
    }

    /// Look up a descriptor by label
    pub fn get(&self, label: &str) -> Result<&ToolchainDescriptor, BuildError> {
        self.entries.get(label).ok_or_else(|| {
            BuildError::config_error_with_hint(
                format!("Unknown toolchain '{}'", label),
                hints::unknown_toolchain(&self.labels()),
            )
        })
    }

    /// All known labels, sorted
    pub fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
