//! Build orchestration
//!
//! Maps a build mode to its build directory and drives the three operations:
//!
//! ```text
//! configure: create <mode>_build/ → cmake ../ -DCMAKE_BUILD_TYPE=.. -G <generator>
//! build:     provider build command, run inside <mode>_build/
//! clean_all: remove release_build/ and debug_build/
//! ```
//!
//! The orchestrator keeps no state between operations. Whether a tree was
//! configured before `build` is left for the native build tool to discover.
//!
//! ## Modules
//!
//! - `platforms` - host providers (Unix-like, Windows-like)
//! - `toolchains` - Visual Studio toolchain descriptors
//! - `cmake` - configure command construction

pub mod cmake;
pub mod platforms;
pub mod toolchains;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::exec::subprocess::{Invocation, ProcessRunner};
use crate::utils::paths;

use cmake::CMakeConfig;
use platforms::PlatformProvider;

/// Build directory for release builds
pub const RELEASE_BUILD_DIR: &str = "release_build";
/// Build directory for debug builds
pub const DEBUG_BUILD_DIR: &str = "debug_build";

/// Build mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BuildMode {
    /// Optimized build
    #[default]
    Release,
    /// Build with debug information
    Debug,
}

impl BuildMode {
    /// Value for CMAKE_BUILD_TYPE
    pub fn cmake_build_type(&self) -> &'static str {
        match self {
            BuildMode::Release => "Release",
            BuildMode::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Release => write!(f, "release"),
            BuildMode::Debug => write!(f, "debug"),
        }
    }
}

/// Build directory name for `mode`
pub fn build_directory_for(mode: BuildMode) -> &'static str {
    match mode {
        BuildMode::Release => RELEASE_BUILD_DIR,
        BuildMode::Debug => DEBUG_BUILD_DIR,
    }
}

/// Remove `release_build/` and `debug_build/` under `root`, whichever exist.
///
/// Needs no provider, so a broken toolchain setup never blocks a clean.
pub fn clean_build_dirs(root: &Path) -> Result<(), BuildError> {
    for mode in [BuildMode::Release, BuildMode::Debug] {
        let dir = root.join(build_directory_for(mode));
        debug!(dir = %dir.display(), "removing build directory");
        paths::remove_dir(&dir)?;
    }
    Ok(())
}

/// Drives configure/build/clean for one host provider
pub struct BuildOrchestrator<'a> {
    /// Directory the build directories are created in
    root: PathBuf,
    /// CMake source directory as seen from a build directory
    source_dir: String,
    provider: &'a dyn PlatformProvider,
    runner: &'a dyn ProcessRunner,
    /// Extra CMake definitions for configure
    definitions: BTreeMap<String, String>,
    /// Environment overrides for every spawned tool
    env: BTreeMap<String, String>,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        provider: &'a dyn PlatformProvider,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            root: root.into(),
            source_dir: crate::config::DEFAULT_SOURCE_DIR.to_string(),
            provider,
            runner,
            definitions: BTreeMap::new(),
            env: BTreeMap::new(),
        }
    }

    /// Override the CMake source directory
    pub fn source_dir(mut self, source_dir: impl Into<String>) -> Self {
        self.source_dir = source_dir.into();
        self
    }

    /// Extra `-D` definitions for the configure step
    pub fn definitions(mut self, definitions: BTreeMap<String, String>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Environment overrides applied on top of the process environment
    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Absolute build directory for `mode`
    pub fn build_dir(&self, mode: BuildMode) -> PathBuf {
        self.root.join(build_directory_for(mode))
    }

    /// CMake options for `mode`: build type, then generator, then definitions
    pub fn cmake_options(&self, mode: BuildMode) -> Vec<String> {
        self.cmake_config(mode).options()
    }

    fn cmake_config(&self, mode: BuildMode) -> CMakeConfig {
        CMakeConfig::new(self.source_dir.clone(), self.build_dir(mode))
            .mode(mode)
            .generator(self.provider.generator_name())
            .variables(self.definitions.clone())
    }

    /// Whether the configured source directory resolves into the build directory for `mode`
    pub fn source_inside_build_dir(&self, mode: BuildMode) -> bool {
        let build_dir = self.build_dir(mode);
        paths::is_subdirectory(&build_dir, &build_dir.join(&self.source_dir))
    }

    /// Create the build directory and run the CMake configure step
    pub fn configure(&self, mode: BuildMode) -> Result<(), BuildError> {
        let build_dir = self.build_dir(mode);
        paths::create_dir(&build_dir)?;

        if self.source_inside_build_dir(mode) {
            warn!(
                source_dir = %self.source_dir,
                build_dir = %build_dir.display(),
                "source directory lies inside the build directory; clean_all will delete it"
            );
        }

        let invocation = self
            .cmake_config(mode)
            .configure_invocation()
            .with_env(self.env.clone());
        info!(mode = %mode, build_dir = %build_dir.display(), "configuring");
        self.runner.run(&invocation)
    }

    /// Run the native build in the build directory for `mode`
    pub fn build(&self, mode: BuildMode, verbose: bool) -> Result<(), BuildError> {
        let build_dir = self.build_dir(mode);
        let command = self.provider.build_command(&build_dir, verbose)?;
        debug!(command = %command, "resolved build command");

        info!(mode = %mode, build_dir = %build_dir.display(), "building");
        self.runner
            .run(&Invocation::new(command, build_dir).with_env(self.env.clone()))
    }

    /// Configure, then build; a failed configure skips the build
    pub fn all(&self, mode: BuildMode, verbose: bool) -> Result<(), BuildError> {
        self.configure(mode)?;
        self.build(mode, verbose)
    }

    /// Remove both build directories, whichever exist
    pub fn clean_all(&self) -> Result<(), BuildError> {
        clean_build_dirs(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::platforms::{UnixProvider, WindowsProvider};
    use crate::build::toolchains::ToolchainRegistry;
    use crate::exec::subprocess::CommandLine;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records invocations instead of spawning them
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<Invocation>>,
        /// Fail every invocation whose program matches
        fail_program: Option<&'static str>,
    }

    impl RecordingRunner {
        fn failing(program: &'static str) -> Self {
            Self {
                fail_program: Some(program),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.fail_program == Some(invocation.command.program()) {
                return Err(BuildError::Process {
                    command: invocation.command.to_string(),
                    code: Some(2),
                });
            }
            Ok(())
        }
    }

    fn four() -> usize {
        4
    }

    #[test]
    fn test_build_directory_for() {
        assert_eq!(build_directory_for(BuildMode::Release), "release_build");
        assert_eq!(build_directory_for(BuildMode::Debug), "debug_build");
        assert_eq!(BuildMode::default(), BuildMode::Release);
    }

    #[test]
    fn test_configure_debug() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::new(None).with_cpu_count(four);
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.configure(BuildMode::Debug).unwrap();

        let debug_dir = temp_dir.path().join("debug_build");
        assert!(debug_dir.is_dir());
        assert!(!temp_dir.path().join("release_build").exists());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].command,
            CommandLine::args([
                "cmake",
                "../",
                "-DCMAKE_BUILD_TYPE=Debug",
                "-G",
                "Unix Makefiles"
            ])
        );
        assert_eq!(calls[0].working_dir, debug_dir);
    }

    #[test]
    fn test_configure_twice_is_fine() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.configure(BuildMode::Release).unwrap();
        orchestrator.configure(BuildMode::Release).unwrap();
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_configure_with_definitions_and_source_dir() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();
        let mut definitions = BTreeMap::new();
        definitions.insert("BUILD_TESTING".to_string(), "OFF".to_string());
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner)
            .source_dir("../engine")
            .definitions(definitions);

        assert_eq!(
            orchestrator.cmake_options(BuildMode::Release),
            vec![
                "-DCMAKE_BUILD_TYPE=Release",
                "-G",
                "Unix Makefiles",
                "-DBUILD_TESTING=OFF"
            ]
        );

        orchestrator.configure(BuildMode::Release).unwrap();
        match &runner.calls()[0].command {
            CommandLine::Args(args) => assert_eq!(args[1], "../engine"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_source_inside_build_dir() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();

        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);
        assert!(!orchestrator.source_inside_build_dir(BuildMode::Release));

        let orchestrator =
            BuildOrchestrator::new(temp_dir.path(), &provider, &runner).source_dir("src");
        assert!(orchestrator.source_inside_build_dir(BuildMode::Debug));

        let orchestrator =
            BuildOrchestrator::new(temp_dir.path(), &provider, &runner).source_dir("../../engine");
        assert!(!orchestrator.source_inside_build_dir(BuildMode::Release));
    }

    #[test]
    fn test_env_overrides_reach_every_invocation() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::new(None).with_cpu_count(four);
        let runner = RecordingRunner::default();
        let mut env = BTreeMap::new();
        env.insert("CC".to_string(), "clang".to_string());
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner).env(env);

        orchestrator.all(BuildMode::Release, false).unwrap();
        for call in runner.calls() {
            assert_eq!(call.env["CC"], "clang");
        }
    }

    #[test]
    fn test_configure_fails_when_dir_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("release_build"), "file").unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        let err = orchestrator.configure(BuildMode::Release).unwrap_err();
        assert!(matches!(err, BuildError::Filesystem { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_build_runs_make_in_build_dir() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::new(None).with_cpu_count(four);
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        // No configure first: the build tool is left to report a missing tree
        orchestrator.build(BuildMode::Release, false).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, CommandLine::args(["make", "--jobs=4"]));
        assert_eq!(calls[0].working_dir, temp_dir.path().join("release_build"));
    }

    #[test]
    fn test_all_configures_then_builds() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::new(None).with_cpu_count(four);
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.all(BuildMode::Debug, true).unwrap();

        let programs: Vec<String> = runner
            .calls()
            .iter()
            .map(|c| c.command.program().to_string())
            .collect();
        assert_eq!(programs, vec!["cmake", "make"]);
        assert_eq!(
            runner.calls()[1].command,
            CommandLine::args(["make", "--debug=v", "--jobs=4"])
        );
    }

    #[test]
    fn test_all_stops_after_failed_configure() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::failing("cmake");
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        let err = orchestrator.all(BuildMode::Release, false).unwrap_err();
        assert!(matches!(err, BuildError::Process { code: Some(2), .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_clean_all_removes_both() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.configure(BuildMode::Release).unwrap();
        orchestrator.configure(BuildMode::Debug).unwrap();
        std::fs::write(temp_dir.path().join("debug_build/CMakeCache.txt"), "").unwrap();

        orchestrator.clean_all().unwrap();
        assert!(!temp_dir.path().join("release_build").exists());
        assert!(!temp_dir.path().join("debug_build").exists());
    }

    #[test]
    fn test_clean_all_tolerates_missing_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let provider = UnixProvider::default();
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.clean_all().unwrap();

        std::fs::create_dir(temp_dir.path().join("debug_build")).unwrap();
        orchestrator.clean_all().unwrap();
        assert!(!temp_dir.path().join("debug_build").exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_clean_build_dirs_without_provider() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("release_build/CMakeFiles")).unwrap();
        std::fs::write(temp_dir.path().join("CMakeLists.txt"), "").unwrap();

        clean_build_dirs(temp_dir.path()).unwrap();
        assert!(!temp_dir.path().join("release_build").exists());
        assert!(temp_dir.path().join("CMakeLists.txt").is_file());
        clean_build_dirs(temp_dir.path()).unwrap();
    }

    #[test]
    fn test_windows_build_runs_launcher() {
        let temp_dir = TempDir::new().unwrap();
        let provider =
            WindowsProvider::new("vs2017Community", &ToolchainRegistry::builtin(), "BabylonCpp.sln")
                .unwrap();
        let runner = RecordingRunner::default();
        let orchestrator = BuildOrchestrator::new(temp_dir.path(), &provider, &runner);

        orchestrator.all(BuildMode::Release, false).unwrap();

        let calls = runner.calls();
        assert_eq!(
            orchestrator.cmake_options(BuildMode::Release),
            vec![
                "-DCMAKE_BUILD_TYPE=Release",
                "-G",
                "Visual Studio 15 2017 Win64"
            ]
        );
        let launcher = temp_dir.path().join("release_build").join("runMSVCBuild.bat");
        assert!(launcher.is_file());
        assert_eq!(
            calls[1].command,
            CommandLine::args([launcher.to_string_lossy().into_owned()])
        );
    }
}
