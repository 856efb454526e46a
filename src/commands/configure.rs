//! Configure command implementation

use anyhow::Result;
use clap::Parser;

use super::{BuildSession, GlobalOptions};
use crate::build::{build_directory_for, BuildMode};
use crate::cli::parse_command_args;
use crate::exec::subprocess::SystemRunner;
use crate::utils::terminal::print_success;

/// Configure the CMake project
#[derive(Parser, Debug)]
pub struct ConfigureCommand {
    /// The build mode
    #[arg(long, value_enum, default_value_t = BuildMode::Release)]
    pub mode: BuildMode,

    /// Visual Studio toolchain label (Windows only)
    #[arg(long)]
    pub toolchain: Option<String>,
}

impl ConfigureCommand {
    pub fn run(args: &[String], _global: &GlobalOptions) -> Result<()> {
        parse_command_args::<Self>("configure", args)?.execute()
    }

    /// Execute the configure command
    pub fn execute(&self) -> Result<()> {
        let session = BuildSession::load()?;
        let provider = session.provider(self.toolchain.as_deref())?;
        let orchestrator = session.orchestrator(provider.as_ref(), &SystemRunner);

        orchestrator.configure(self.mode)?;

        print_success(&format!(
            "Configured {} build in {}/",
            self.mode,
            build_directory_for(self.mode)
        ));
        Ok(())
    }
}
