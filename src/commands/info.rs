//! Info command implementation

use anyhow::Result;
use clap::Parser;
use console::style;

use super::{BuildSession, GlobalOptions};
use crate::build::cmake::{cmake_version, is_cmake_available};
use crate::build::platforms::{resolve_toolchain_label, HostPlatform};
use crate::build::toolchains::ToolchainRegistry;
use crate::build::{build_directory_for, BuildMode};
use crate::cli::parse_command_args;
use crate::exec::subprocess::{command_exists, find_program};
use crate::utils::paths::{absolute, cpu_count, is_subdirectory_strict};
use crate::utils::terminal::{print_field, print_warning};

/// Show the host platform, generator and toolchain setup
#[derive(Parser, Debug)]
pub struct InfoCommand {
    /// Visual Studio toolchain label (Windows only)
    #[arg(long)]
    pub toolchain: Option<String>,
}

impl InfoCommand {
    pub fn run(args: &[String], _global: &GlobalOptions) -> Result<()> {
        parse_command_args::<Self>("info", args)?.execute()
    }

    /// Execute the info command
    pub fn execute(&self) -> Result<()> {
        let session = BuildSession::load()?;
        let provider = session.provider(self.toolchain.as_deref())?;

        println!("{}", style("Host").cyan().bold());
        print_field("platform", &session.host.to_string());
        print_field("platform key", &provider.platform_key());
        print_field("generator", &provider.generator_name());
        print_field("cpus", &cpu_count().to_string());

        println!("{}", style("Project").cyan().bold());
        print_field("root", &session.root.display().to_string());
        print_field("source dir", &session.config.project.source_dir);
        let release_dir = session.root.join(build_directory_for(BuildMode::Release));
        let source = absolute(&release_dir.join(&session.config.project.source_dir));
        let inside = if is_subdirectory_strict(&source, &release_dir) {
            "yes"
        } else {
            "no"
        };
        print_field("resolved source", &source.display().to_string());
        print_field("builds inside source", inside);
        for mode in [BuildMode::Release, BuildMode::Debug] {
            let dir = build_directory_for(mode);
            let state = if session.root.join(dir).is_dir() {
                "present"
            } else {
                "absent"
            };
            print_field(dir, state);
        }

        println!("{}", style("Tools").cyan().bold());
        let cmake = match (find_program("cmake"), cmake_version()) {
            (Some(path), Some(version)) => format!("{} ({})", version, path.display()),
            (Some(path), None) => path.display().to_string(),
            _ => "not found".to_string(),
        };
        print_field("cmake", &cmake);

        match session.host {
            HostPlatform::UnixLike => {
                let make = if command_exists("make") { "found" } else { "not found" };
                print_field("make", make);
                let jobs = session
                    .config
                    .build
                    .jobs
                    .map(|j| j.to_string())
                    .unwrap_or_else(|| format!("{} (cpu count)", cpu_count()));
                print_field("jobs", &jobs);
            }
            HostPlatform::WindowsLike => {
                let label = resolve_toolchain_label(self.toolchain.as_deref(), &session.config);
                let registry = ToolchainRegistry::with_overrides(&session.config.toolchains);
                let toolchain = registry.get(&label)?;
                print_field("toolchain", &label);
                print_field(
                    "product",
                    &format!("{} ({})", toolchain.product_name, toolchain.version_number),
                );
                let available = if toolchain.is_available() { "" } else { " (missing)" };
                print_field(
                    "env script",
                    &format!("{}{}", toolchain.env_script.display(), available),
                );
                print_field("solution", &session.config.project.solution);
                print_field("known toolchains", &registry.labels().join(", "));
            }
        }

        if !is_cmake_available() {
            print_warning("cmake is not on PATH; configure will fail");
        }
        Ok(())
    }
}
