//! Synchronous subprocess execution
//!
//! Children inherit stdin/stdout/stderr so tool output streams straight to the
//! user. The caller blocks until the child exits.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::BuildError;

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// Program followed by its arguments, no shell involved
    Args(Vec<String>),
    /// A single string handed to the platform shell
    Shell(String),
}

impl CommandLine {
    /// Build an argument vector from anything string-like
    pub fn args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine::Args(args.into_iter().map(Into::into).collect())
    }

    /// Name of the program that gets spawned
    pub fn program(&self) -> &str {
        match self {
            CommandLine::Args(args) => args.first().map(String::as_str).unwrap_or(""),
            CommandLine::Shell(_) => shell_program(),
        }
    }

    fn to_command(&self) -> Command {
        match self {
            CommandLine::Args(args) => {
                let mut cmd = Command::new(self.program());
                cmd.args(args.iter().skip(1));
                cmd
            }
            CommandLine::Shell(line) => {
                let mut cmd = Command::new(shell_program());
                cmd.arg(shell_flag()).arg(line);
                cmd
            }
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Args(args) => write!(f, "{}", args.join(" ")),
            CommandLine::Shell(line) => write!(f, "{}", line),
        }
    }
}

#[cfg(windows)]
fn shell_program() -> &'static str {
    "cmd"
}

#[cfg(windows)]
fn shell_flag() -> &'static str {
    "/C"
}

#[cfg(not(windows))]
fn shell_program() -> &'static str {
    "sh"
}

#[cfg(not(windows))]
fn shell_flag() -> &'static str {
    "-c"
}

/// A command bound to its working directory and environment overrides
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: CommandLine,
    pub working_dir: PathBuf,
    /// Applied on top of the current process environment
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(command: CommandLine, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
        }
    }

    /// Replace the environment overrides
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }
}

/// Executes invocations to completion
pub trait ProcessRunner {
    /// Run `invocation`, failing if it cannot start or exits unsuccessfully
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
        let Invocation {
            command,
            working_dir,
            env,
        } = invocation;

        println!("Executing '{}' in '{}'", command, working_dir.display());

        // Otherwise the spawn fails with NotFound and reads like a missing program
        if !working_dir.is_dir() {
            return Err(BuildError::filesystem(
                "enter working directory",
                working_dir,
                io::Error::new(io::ErrorKind::NotFound, "directory does not exist"),
            ));
        }

        // The child inherits the process environment; overrides replace inherited keys
        let mut cmd = command.to_command();
        cmd.current_dir(working_dir)
            .envs(env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!(?cmd, "spawning");

        let status = cmd.status().map_err(|source| BuildError::Spawn {
            program: command.program().to_string(),
            source,
        })?;

        if !status.success() {
            return Err(BuildError::Process {
                command: command.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Resolve a program on PATH
pub fn find_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
