//! Build command implementation

use anyhow::Result;
use clap::Parser;

use super::{BuildSession, GlobalOptions};
use crate::build::{build_directory_for, BuildMode};
use crate::cli::parse_command_args;
use crate::exec::subprocess::SystemRunner;
use crate::utils::terminal::{print_success, print_warning};

/// Build a tree that `configure` already set up
#[derive(Parser, Debug)]
pub struct BuildCommand {
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

impl BuildCommand {
    pub fn run(args: &[String], global: &GlobalOptions) -> Result<()> {
        parse_command_args::<Self>("build", args)?.execute(global)
    }

    /// Execute the build command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let session = BuildSession::load()?;
        let provider = session.provider(self.toolchain.as_deref())?;
        let orchestrator = session.orchestrator(provider.as_ref(), &SystemRunner);

        let build_dir = orchestrator.build_dir(self.mode);
        if !build_dir.is_dir() {
            print_warning(&format!(
                "{}/ does not exist; run `cmbuild configure --mode={}` first",
                build_directory_for(self.mode),
                self.mode
            ));
        }

        orchestrator.build(self.mode, self.verbose || global.verbose)?;

        print_success(&format!("{} build finished", self.mode));
        Ok(())
    }
}
