//! Clean command implementation

use anyhow::{Context, Result};
use clap::Parser;

use super::GlobalOptions;
use crate::build::{
    build_directory_for, clean_build_dirs, BuildMode, DEBUG_BUILD_DIR, RELEASE_BUILD_DIR,
};
use crate::cli::parse_command_args;
use crate::utils::terminal::{print_info, print_success};

/// Remove the release and debug build directories
#[derive(Parser, Debug)]
pub struct CleanAllCommand {}

impl CleanAllCommand {
    pub fn run(args: &[String], _global: &GlobalOptions) -> Result<()> {
        parse_command_args::<Self>("clean_all", args)?.execute()
    }

    /// Execute the clean_all command
    ///
    /// Only the invocation directory matters here; neither cmbuild.toml nor
    /// the host toolchain is consulted.
    pub fn execute(&self) -> Result<()> {
        let root = std::env::current_dir().context("Failed to get current directory")?;

        let existed = [BuildMode::Release, BuildMode::Debug]
            .iter()
            .any(|mode| root.join(build_directory_for(*mode)).exists());

        clean_build_dirs(&root)?;

        if existed {
            print_success(&format!("Removed {}/ and {}/", RELEASE_BUILD_DIR, DEBUG_BUILD_DIR));
        } else {
            print_info("Nothing to clean");
        }
        Ok(())
    }
}
