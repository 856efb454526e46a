//! cmbuild - one command vocabulary for CMake projects on Unix and Windows
//!
//! ## Architecture
//!
//! ```text
//! cli (command table) → commands/ → build::BuildOrchestrator
//!                                      ├─ build::platforms (Unix make / Windows msbuild launcher)
//!                                      ├─ utils::paths (build directory lifecycle)
//!                                      └─ exec::subprocess (cmake, make, launcher)
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::BuildError;
use utils::terminal;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        terminal::disable_colors();
    }
    terminal::init_logging(cli.verbose);

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Print `err` and map it to the process exit code
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<BuildError>() {
        // Already reported together with the usage text
        Some(e @ BuildError::UnrecognizedCommand { .. }) => ExitCode::from(e.exit_code()),
        Some(e) => {
            e.display_with_hints();
            ExitCode::from(e.exit_code())
        }
        None => {
            terminal::print_error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
