//! CLI argument parsing and command dispatch
//!
//! The top-level parser only splits off the command name. The name is looked
//! up in [`COMMANDS`] and the remaining arguments go to that command's own
//! clap parser, so `cmbuild all --mode=debug` parses `--mode` in `all`.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use crate::commands::{
    all::AllCommand, build::BuildCommand, clean::CleanAllCommand, configure::ConfigureCommand,
    info::InfoCommand, GlobalOptions,
};
use crate::error::BuildError;

/// Handler for one subcommand: receives the arguments after the command name
pub type CommandHandler = fn(&[String], &GlobalOptions) -> Result<()>;

/// One row of the dispatch table
pub struct CommandEntry {
    pub name: &'static str,
    /// Usage line shown in help, without the program name
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: CommandHandler,
}

/// Every recognized subcommand
pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "all",
        usage: "all [--mode=<mode>] [--verbose] [--toolchain=<label>]",
        summary: "configures and builds all the targets",
        handler: AllCommand::run,
    },
    CommandEntry {
        name: "build",
        usage: "build [--mode=<mode>] [--verbose] [--toolchain=<label>]",
        summary: "builds an already configured tree",
        handler: BuildCommand::run,
    },
    CommandEntry {
        name: "clean_all",
        usage: "clean_all",
        summary: "cleans all the build directories",
        handler: CleanAllCommand::run,
    },
    CommandEntry {
        name: "configure",
        usage: "configure [--mode=<mode>] [--toolchain=<label>]",
        summary: "configures the cmake project",
        handler: ConfigureCommand::run,
    },
    CommandEntry {
        name: "info",
        usage: "info [--toolchain=<label>]",
        summary: "shows the host platform and toolchain setup",
        handler: InfoCommand::run,
    },
];

/// Find a command by exact name
pub fn lookup(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

/// Command list appended to the top-level help
fn commands_help() -> String {
    let mut help = String::from("The supported build commands are:\n");
    for entry in COMMANDS {
        help.push_str(&format!("    {:<56} {}\n", entry.usage, entry.summary));
    }
    help.push_str("\n<mode> is either 'release' (default) or 'debug'.");
    help
}

/// cmbuild - configure and build a CMake project with the host's native toolchain
#[derive(Parser, Debug)]
#[command(name = "cmbuild")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "cmbuild [OPTIONS] <command> [<args>]")]
#[command(after_help = commands_help())]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Subcommand to run
    pub command: Option<String>,

    /// Arguments for the subcommand
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let global = GlobalOptions {
            verbose: self.verbose,
        };

        let Some(name) = self.command.as_deref() else {
            print_usage()?;
            return Err(BuildError::config_error("No command given").into());
        };

        match lookup(name) {
            Some(entry) => (entry.handler)(&self.args, &global),
            None => {
                println!("Unrecognized command");
                print_usage()?;
                Err(BuildError::UnrecognizedCommand {
                    name: name.to_string(),
                }
                .into())
            }
        }
    }
}

/// Print the top-level help, including the command list
pub fn print_usage() -> std::io::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Parse a subcommand's arguments with its own clap parser
pub fn parse_command_args<P: Parser>(name: &str, args: &[String]) -> Result<P, BuildError> {
    let argv = std::iter::once(format!("cmbuild {}", name)).chain(args.iter().cloned());
    P::try_parse_from(argv).map_err(BuildError::Argument)
}
