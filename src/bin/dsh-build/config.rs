use std::path::PathBuf;

use clap::Parser;
use dsh::{config::BuildConfigFile, invoker::Toolchain};

const DEFAULT_WORKDIR: &str = ".";

/// Build a release, stamped with the latest tag and the current commit
#[derive(Parser)]
#[command(name = "dsh-build", version = dsh::LONG_VERSION)]
pub struct BuildConfig {
    /// The loglevel to operate on (0 = warn, 1 = info, 2 = debug, * = trace)
    #[arg(long = "loglevel", short = 'v', default_value_t = 0)]
    pub loglevel: u8,

    /// The directory to query version control in and to build from
    #[arg(long, short = 'C', default_value = DEFAULT_WORKDIR)]
    pub workdir: PathBuf,

    /// The configuration file to use [<workdir>/dsh-build.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// The toolchain to build with
    #[arg(long, value_enum)]
    pub toolchain: Option<Toolchain>,

    /// Invoke this program instead of the toolchain's compiler, keeping the arguments
    #[arg(long)]
    pub compiler: Option<String>,

    /// The package holding the `version` and `commit` variables
    #[arg(long)]
    pub package: Option<String>,

    /// Keep symbols and debug information
    #[arg(long, default_value_t = false)]
    pub no_strip: bool,

    /// Fail instead of building with an empty version or commit
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Only print the command line, do not execute it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(long, short)]
    /// Print and run this command line through the shell instead of building
    pub exec: Option<String>,
}

impl BuildConfig {
    /// Returns the configuration layer given on the command line
    pub fn overrides(&self) -> BuildConfigFile {
        BuildConfigFile {
            toolchain: self.toolchain,
            compiler: self.compiler.clone(),
            package: self.package.clone(),
            strip: self.no_strip.then_some(false),
            strict: self.strict.then_some(true),
        }
    }
}
