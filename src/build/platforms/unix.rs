//! Unix-like provider: Makefiles built with `make`

use std::path::Path;

use super::{platform_key, PlatformProvider};
use crate::error::BuildError;
use crate::exec::subprocess::CommandLine;
use crate::utils::paths::cpu_count;

/// CMake generator used on Unix-like hosts
pub const UNIX_GENERATOR: &str = "Unix Makefiles";

/// Linux, macOS and other Unix hosts
pub struct UnixProvider {
    /// Fixed job count; falls back to `cpu_count` when `None`
    jobs: Option<usize>,
    cpu_count: fn() -> usize,
}

impl UnixProvider {
    pub fn new(jobs: Option<usize>) -> Self {
        Self {
            jobs,
            cpu_count,
        }
    }

    /// Use a different processor count source
    pub fn with_cpu_count(mut self, cpu_count: fn() -> usize) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    /// Jobs passed to `make --jobs`
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| (self.cpu_count)())
    }
}

impl Default for UnixProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PlatformProvider for UnixProvider {
    fn generator_name(&self) -> String {
        UNIX_GENERATOR.to_string()
    }

    fn platform_key(&self) -> String {
        platform_key(
            std::env::consts::OS,
            std::env::consts::ARCH,
            usize::BITS,
        )
    }

    fn build_command(&self, _build_dir: &Path, verbose: bool) -> Result<CommandLine, BuildError> {
        let mut args = vec!["make".to_string()];
        if verbose {
            args.push("--debug=v".to_string());
        }
        args.push(format!("--jobs={}", self.jobs()));
        Ok(CommandLine::Args(args))
    }
}
