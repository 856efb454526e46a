//! All command implementation

use anyhow::Result;
use clap::Parser;

use super::{BuildSession, GlobalOptions};
use crate::build::{build_directory_for, BuildMode};
use crate::cli::parse_command_args;
use crate::exec::subprocess::SystemRunner;
use crate::utils::terminal::print_success;

/// Configure the CMake project, then build all the targets
#[derive(Parser, Debug)]
pub struct AllCommand {
    /// The build mode
    #[arg(long, value_enum, default_value_t = BuildMode::Release)]
    pub mode: BuildMode,

    /// Ask the native build tool for verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Visual Studio toolchain label (Windows only)
    #[arg(long)]
    pub toolchain: Option<String>,
}

impl AllCommand {
    pub fn run(args: &[String], global: &GlobalOptions) -> Result<()> {
        parse_command_args::<Self>("all", args)?.execute(global)
    }

    /// Execute the all command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let session = BuildSession::load()?;
        let provider = session.provider(self.toolchain.as_deref())?;
        let orchestrator = session.orchestrator(provider.as_ref(), &SystemRunner);

        orchestrator.all(self.mode, self.verbose || global.verbose)?;

        print_success(&format!(
            "{} build finished in {}/",
            self.mode,
            build_directory_for(self.mode)
        ));
        Ok(())
    }
}
