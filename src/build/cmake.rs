//! CMake configure invocation
//!
//! Builds the `cmake <source> <options>` command line for the configure step.
//! Running it is left to a [`ProcessRunner`](crate::exec::subprocess::ProcessRunner).

use std::path::PathBuf;
use std::process::Command;

use super::BuildMode;
use crate::exec::subprocess::{CommandLine, Invocation};

/// CMake configuration builder
#[derive(Debug)]
pub struct CMakeConfig {
    /// Source directory as seen from the build directory
    source_dir: String,
    /// Build directory, also the working directory of the configure step
    build_dir: PathBuf,
    /// Build mode, mapped to CMAKE_BUILD_TYPE
    mode: BuildMode,
    /// Generator (e.g., "Unix Makefiles", "Visual Studio 15 2017 Win64")
    generator: Option<String>,
    /// CMake variables (-D options)
    variables: Vec<(String, String)>,
}

impl CMakeConfig {
    /// Create a new CMake configuration
    pub fn new(source_dir: impl Into<String>, build_dir: PathBuf) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_dir,
            mode: BuildMode::default(),
            generator: None,
            variables: Vec::new(),
        }
    }

    /// Set the build mode
    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the generator
    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Set multiple CMake variables
    pub fn variables<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.variables.extend(vars);
        self
    }

    /// Options in order: build type, generator, then variables
    pub fn options(&self) -> Vec<String> {
        let mut options = vec![format!("-DCMAKE_BUILD_TYPE={}", self.mode.cmake_build_type())];

        if let Some(generator) = &self.generator {
            options.push("-G".to_string());
            options.push(generator.clone());
        }

        for (name, value) in &self.variables {
            options.push(format!("-D{}={}", name, value));
        }

        options
    }

    /// `cmake <source_dir> <options>` running inside the build directory
    pub fn configure_invocation(&self) -> Invocation {
        let mut args = vec!["cmake".to_string(), self.source_dir.clone()];
        args.extend(self.options());
        Invocation::new(CommandLine::Args(args), self.build_dir.clone())
    }
}

/// Check if CMake is available
pub fn is_cmake_available() -> bool {
    which::which("cmake").is_ok()
}

/// Get CMake version
pub fn cmake_version() -> Option<String> {
    let output = Command::new("cmake").arg("--version").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_cmake_version(&stdout)
}

/// Parse "cmake version X.Y.Z" from `cmake --version` output
fn parse_cmake_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("cmake version "))
        .map(|v| v.trim().to_string())
}
