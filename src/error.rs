//! Error types and helpers for user-friendly error messages
//!
//! Every failure is terminal for the current invocation. The variant decides
//! the process exit code, see [`BuildError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for configuration problems and unrecognized commands
pub const EXIT_CONFIGURATION: u8 = 1;
/// Exit code for filesystem failures
pub const EXIT_FILESYSTEM: u8 = 3;
/// Exit code for external processes that failed or could not start
pub const EXIT_PROCESS: u8 = 4;

/// Errors surfaced by cmbuild
#[derive(Error, Debug)]
pub enum BuildError {
    /// Unknown toolchain label, unsupported host, malformed cmbuild.toml
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        hint: Option<String>,
    },

    /// Subcommand not present in the command table
    #[error("Unrecognized command '{name}'")]
    UnrecognizedCommand { name: String },

    /// Malformed command line flags
    #[error(transparent)]
    Argument(#[from] clap::Error),

    /// Directory create/remove or launcher write failed
    #[error("Failed to {op} '{}': {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be started at all
    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program ran and exited unsuccessfully
    #[error("Command '{command}' failed with {}", describe_code(*code))]
    Process { command: String, code: Option<i32> },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl BuildError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a configuration error with a hint
    pub fn config_error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn filesystem(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            BuildError::Configuration { .. } | BuildError::UnrecognizedCommand { .. } => {
                EXIT_CONFIGURATION
            }
            BuildError::Argument(err) => u8::try_from(err.exit_code()).unwrap_or(2),
            BuildError::Filesystem { .. } => EXIT_FILESYSTEM,
            BuildError::Spawn { .. } | BuildError::Process { .. } => EXIT_PROCESS,
        }
    }

    /// Hint shown under the error, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            BuildError::Configuration { hint, .. } => hint.clone(),
            BuildError::Spawn { program, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    Some(hints::for_tool(program).to_string())
                } else {
                    None
                }
            }
            BuildError::Process { .. } => Some(hints::process_failure().to_string()),
            BuildError::Filesystem {
                op: "enter working directory",
                ..
            } => Some(hints::missing_build_dir().to_string()),
            _ => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        // clap renders its own usage block
        if let BuildError::Argument(err) = self {
            let _ = err.print();
            return;
        }

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let Some(hint) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
        }

        eprintln!();
    }
}

/// Common error hints for missing tools
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake"
    }

    /// Get hint for missing make
    pub fn make() -> &'static str {
        "Install a make-compatible build tool:\n\
         • macOS: xcode-select --install\n\
         • Ubuntu: sudo apt install build-essential"
    }

    /// Get hint for missing Visual Studio
    pub fn visual_studio() -> &'static str {
        "Install Visual Studio with C++ support:\n\
         1. Download from https://visualstudio.microsoft.com/\n\
         2. Select 'Desktop development with C++' workload\n\
         3. Install\n\
         \n\
         If it is installed elsewhere, point env_script at VsDevCmd.bat in a\n\
         [toolchains.<label>] section of cmbuild.toml."
    }

    /// Get hint for unknown toolchain labels
    pub fn unknown_toolchain(known: &[String]) -> String {
        format!(
            "Known toolchains: {}\n\
             Select one with --toolchain <label> or CMBUILD_TOOLCHAIN, or add a\n\
             [toolchains.<label>] section to cmbuild.toml.",
            known.join(", ")
        )
    }

    /// Get hint for a build tool that exited unsuccessfully
    pub fn process_failure() -> &'static str {
        "The tool's own output above describes the failure.\n\
         Run `cmbuild clean_all` and configure again if the build tree is stale."
    }

    /// Get hint for building before the tree exists
    pub fn missing_build_dir() -> &'static str {
        "The build directory is created by configure.\n\
         Run `cmbuild configure --mode=<mode>` or `cmbuild all` first."
    }

    /// Get installation hint for a tool
    pub fn for_tool(program: &str) -> &'static str {
        match program {
            "cmake" => cmake(),
            "make" => make(),
            "msbuild" => visual_studio(),
            p if p.ends_with(".bat") => visual_studio(),
            _ => "Install this tool and ensure it's in your PATH",
        }
    }
}
