//! The build invoker: stamps version control information into a release build
use std::{collections::BTreeMap, fmt::Display, process::ExitStatus};

use clap::ValueEnum;
use log::info;
use serde::Deserialize;

use crate::{
    config::BuildSettings,
    env::{command_line, CustomExecutable, Environment, EnvironmentExecutable, Invocation},
    error::{Error, ErrorExt},
    util::signal::SignalDispatcher,
    vcs::BuildInfo,
};

/// The environment variable carrying the version into a cargo build
pub const VERSION_ENV: &str = "DSH_VERSION";
/// The environment variable carrying the commit into a cargo build
pub const COMMIT_ENV: &str = "DSH_COMMIT";

/// The toolchains a build can be stamped for
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// `go build`, stamping through `-ldflags -X`
    #[default]
    Go,
    /// `cargo build --release`, stamping through environment variables picked up by `build.rs`
    Cargo,
}

impl Toolchain {
    /// Returns the program to invoke for this toolchain
    pub fn default_program(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Cargo => "cargo",
        }
    }
}

impl Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Go => "go",
                Self::Cargo => "cargo",
            }
        )
    }
}

/// A compiler invocation embedding a `BuildInfo` as link-time variable overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    /// The toolchain to build with
    pub toolchain: Toolchain,
    /// Overrides the program of the toolchain, keeping its arguments
    pub compiler: Option<String>,
    /// The package the `version` and `commit` variables live in (`-X <package>.version`)
    pub package: String,
    /// Whether to request stripped symbols and debug information
    pub strip: bool,
    /// The information to embed
    pub info: BuildInfo,
}

impl BuildCommand {
    /// Creates the build command for `info` using the resolved `settings`
    /// # Arguments
    /// * `info` - The build information to embed
    /// * `settings` - The settings to build with
    pub fn new(info: BuildInfo, settings: &BuildSettings) -> Self {
        Self {
            toolchain: settings.toolchain,
            compiler: settings.compiler.clone(),
            package: settings.package.clone(),
            strip: settings.strip,
            info,
        }
    }

    /// Returns the program that gets invoked
    pub fn get_program(&self) -> String {
        match &self.compiler {
            Some(compiler) => compiler.clone(),
            None => self.toolchain.default_program().to_string(),
        }
    }

    /// Returns the argument vector passed to the program
    pub fn get_args(&self) -> Vec<String> {
        match self.toolchain {
            Toolchain::Go => vec!["build".into(), "-ldflags".into(), self.ldflags()],
            Toolchain::Cargo => {
                let mut args: Vec<String> = vec!["build".into(), "--release".into()];
                if self.strip {
                    for config in ["profile.release.strip=true", "profile.release.debug=0"] {
                        args.push("--config".into());
                        args.push(config.into());
                    }
                }
                args
            }
        }
    }

    /// The value for go's `-ldflags`: `-w -s -X <pkg>.version=<version> -X <pkg>.commit=<commit>`
    fn ldflags(&self) -> String {
        let vars = format!(
            "-X {pkg}.version={} -X {pkg}.commit={}",
            self.info.version,
            self.info.commit,
            pkg = self.package
        );

        if self.strip {
            format!("-w -s {}", vars)
        } else {
            vars
        }
    }
}

impl EnvironmentExecutable for BuildCommand {
    fn get_name(&self) -> String {
        format!("Build ({})", self.toolchain)
    }

    fn get_env_variables(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        if self.toolchain == Toolchain::Cargo {
            map.insert(VERSION_ENV.to_string(), self.info.version.clone());
            map.insert(COMMIT_ENV.to_string(), self.info.commit.clone());
        }

        map
    }

    fn get_invocation(&self) -> Invocation {
        Invocation::program(self.get_program(), self.get_args())
    }
}

impl Display for BuildCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", command_line(self))
    }
}

/// Prints executables and runs them in an environment, handing back their exit status
pub struct Invoker<'a> {
    /// The environment to run executables in
    environment: &'a dyn Environment,
    /// The signal dispatcher to register handlers with while a child runs
    signal_dispatcher: &'a SignalDispatcher,
}

impl<'a> Invoker<'a> {
    /// Creates a new invoker
    /// # Arguments
    /// * `environment` - The environment to execute in
    /// * `signal_dispatcher` - The signal dispatcher to use
    pub fn new(environment: &'a dyn Environment, signal_dispatcher: &'a SignalDispatcher) -> Self {
        Self {
            environment,
            signal_dispatcher,
        }
    }

    /// Prints the command line of `executable` to standard output
    pub fn print(&self, executable: &dyn EnvironmentExecutable) {
        println!("{}", command_line(executable));
    }

    /// Prints the command line of `executable`, then executes it and waits for it to exit
    ///
    /// An unsuccessful exit is not an error, the status is handed back as-is.
    /// # Arguments
    /// * `executable` - The executable to run
    /// # Errors
    /// If the executable cannot be started
    pub fn run(&self, executable: &dyn EnvironmentExecutable) -> Result<ExitStatus, Error> {
        self.print(executable);

        let status = self
            .environment
            .execute(executable, self.signal_dispatcher)
            .e_context(|| format!("Running '{}'", executable.get_name()))?;

        if status.success() {
            info!("'{}' exited with {}", executable.get_name(), status);
        } else {
            info!("'{}' failed with {}", executable.get_name(), status);
        }

        Ok(status)
    }

    /// Prints `line`, then hands it to the host shell and waits for it to exit
    /// # Arguments
    /// * `line` - The command line to run, shell metacharacters are interpreted
    pub fn run_shell(&self, line: &str) -> Result<ExitStatus, Error> {
        let executable = CustomExecutable::new(line.to_string(), BTreeMap::new());
        self.run(&executable)
    }
}
