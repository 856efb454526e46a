//! Command implementations
//!
//! Each command module provides a clap-derived struct, a `run` entry for the
//! dispatch table and an `execute` method.

pub mod all;
pub mod build;
pub mod clean;
pub mod configure;
pub mod info;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::build::platforms::{select_provider, HostPlatform, PlatformProvider};
use crate::build::BuildOrchestrator;
use crate::config::CmbuildConfig;
use crate::exec::subprocess::ProcessRunner;

/// Options given before the command name
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOptions {
    pub verbose: bool,
}

/// Invocation directory, its configuration and the detected host
pub struct BuildSession {
    pub root: PathBuf,
    pub config: CmbuildConfig,
    pub host: HostPlatform,
}

impl BuildSession {
    /// Load the session for the current directory
    pub fn load() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to get current directory")?;
        let host = HostPlatform::detect()?;
        let config = CmbuildConfig::load(&root)?;
        Ok(Self { root, config, host })
    }

    /// The provider for this host; `toolchain` overrides the configured label
    pub fn provider(&self, toolchain: Option<&str>) -> Result<Box<dyn PlatformProvider>> {
        Ok(select_provider(self.host, &self.config, toolchain)?)
    }

    /// Orchestrator rooted at the invocation directory
    pub fn orchestrator<'a>(
        &self,
        provider: &'a dyn PlatformProvider,
        runner: &'a dyn ProcessRunner,
    ) -> BuildOrchestrator<'a> {
        BuildOrchestrator::new(self.root.clone(), provider, runner)
            .source_dir(self.config.project.source_dir.clone())
            .definitions(self.config.cmake.definitions.clone())
            .env(self.config.env.clone())
    }
}
